//! Czech ARES business register extract (VREO).
//!
//! The bulk export is a gzipped tarball holding one XML document per
//! registered company. Each document yields the company, its statutory
//! members as people, and a directorship per member with a function.

use std::io::{BufReader, Read};

use super::Dataset;
use super::common::make_oc_company_id;
use crate::address::AddressParts;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::entity::Entity;
use crate::entity::ids::{make_entity_id, slugify};
use crate::error::Result;
use crate::reader::{XmlElement, for_each_tar_gz_entry};
use crate::schema::Schema;
use crate::utils::logging::log_warning;
use crate::utils::text::join_text;

const URL: &str = "http://wwwinfo.mfcr.cz/ares/ares_vreo_all.tar.gz";

pub struct CzBusinessRegister;

/// OpenCorporates id from the ICO, else a slug of the company name
fn company_id(context: &Context, reg_nr: Option<&str>, name: Option<&str>) -> Option<String> {
    match reg_nr {
        Some(nr) => Some(make_oc_company_id("cz", nr)),
        None => context.make_slug(["company", name.unwrap_or_default()]),
    }
}

/// Members are keyed on their name plus a hash of their address, or of the
/// company when the address is empty
fn person_id(context: &Context, name: &str, address: Option<&str>, company_id: &str) -> Option<String> {
    let anchor = match address.filter(|a| slugify(a).is_some()) {
        Some(address) => make_entity_id([address]),
        None => make_entity_id([company_id]),
    };
    context.make_slug(["person", name, anchor.as_deref().unwrap_or_default()])
}

/// Format an ARES address block (`Sidlo`, `adresa`) as one line
fn make_address(element: Option<&XmlElement>) -> Option<String> {
    let element = element?;
    let street = join_text(
        [element.findtext("ulice"), element.findtext("cisloTxt")].into_iter().flatten(),
        " ",
    );
    let summary = join_text([street, element.findtext("okres")].into_iter().flatten(), ", ");
    let parts = AddressParts {
        summary,
        state: element.findtext("stat"),
        postal_code: element.findtext("psc"),
        city: element.findtext("obec"),
        country_code: Some("cz".to_string()),
        ..AddressParts::default()
    };
    parts.format_line()
}

fn make_company(context: &Context, doc: &XmlElement) -> Result<Option<Entity>> {
    let name = doc.findtext(".//ObchodniFirma");
    let reg_nr = doc.findtext(".//ICO");
    let mut company = context.make(Schema::Company);
    company.id = company_id(context, reg_nr.as_deref(), name.as_deref());
    if company.id.is_none() {
        return Ok(None);
    }
    company.add("name", name)?;
    company.add("registrationNumber", reg_nr)?;
    company.add("jurisdiction", "cz")?;
    company.add("address", make_address(doc.find(".//Sidlo")))?;
    company.add("incorporationDate", doc.findtext(".//DatumZapisu"))?;
    company.add("dissolutionDate", doc.findtext(".//DatumVymazu"))?;
    Ok(Some(company))
}

fn parse_member(context: &mut Context, company: &Entity, member: &XmlElement) -> Result<()> {
    let company_id = company.id.as_deref().unwrap_or_default();
    let mut person = context.make(Schema::Person);
    let first_name = member.findtext("fosoba/jmeno");
    let last_name = member.findtext("fosoba/prijmeni");
    if let (Some(first), Some(last)) = (&first_name, &last_name) {
        person.add("name", format!("{first} {last}"))?;
    }
    person.add("firstName", first_name)?;
    person.add("lastName", last_name)?;
    let address = make_address(member.find(".//adresa"));
    person.add("address", address.as_deref())?;
    let caption = person.caption().unwrap_or_default();
    person.id = person_id(context, &caption, address.as_deref(), company_id);
    if person.id.is_none() {
        return Ok(());
    }
    context.emit(&person)?;

    if let Some(role) = member.findtext("funkce/nazev") {
        let mut rel = context.make(Schema::Directorship);
        rel.id = context.make_slug(["directorship", company_id, person.id.as_deref().unwrap_or_default()]);
        rel.add("role", role)?;
        rel.add("director", &person)?;
        rel.add("organization", company)?;
        context.emit(&rel)?;
    }
    Ok(())
}

/// Parse one company document
pub(crate) fn parse_document(context: &mut Context, doc: &XmlElement) -> Result<()> {
    let Some(company) = make_company(context, doc)? else {
        return Ok(());
    };
    context.emit(&company)?;
    for member in doc.find_all(".//Clen") {
        parse_member(context, &company, member)?;
    }
    Ok(())
}

impl Dataset for CzBusinessRegister {
    fn name(&self) -> &'static str {
        "cz_business_register"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "Czech Public Register of Business Entities (ARES)")
            .with_prefix("cz")
            .with_url("https://wwwinfo.mfcr.cz/ares/ares_vreo_all.html.cz")
            .with_data_url(URL)
            .with_summary("Companies registered in the Czech Republic with their statutory bodies")
            .with_publisher("Ministerstvo financí", Some("https://www.mfcr.cz/"), Some("cz"))
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let path = context.fetch_resource("data.tar.gz", URL)?;
        let mut progress = context.progress("documents");
        for_each_tar_gz_entry(&path, |name, reader: &mut dyn Read| {
            progress.tick();
            match XmlElement::parse(BufReader::new(reader)) {
                Ok(doc) => parse_document(&mut *context, &doc),
                Err(err) => {
                    log_warning(context.name(), &format!("Skipping {name}: {err}"), Some(&path));
                    Ok(())
                }
            }
        })?;
        progress.finish();
        Ok(())
    }
}
