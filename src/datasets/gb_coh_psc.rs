//! UK Companies House: basic company data and persons with significant control.
//!
//! Two bulk products are combined. The basic company data is a zip of CSV
//! with one row per company. The PSC snapshot is a zip of JSON lines, one
//! statement per line, describing who controls a company and how. Download
//! locations change with every release and are discovered from the product
//! pages when the files are not already present.

use std::sync::LazyLock;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::Dataset;
use super::common::{for_each_zip_row, make_oc_company_id, oc_url};
use crate::address::{AddressParts, attach_address};
use crate::audit::{audit_json, audit_row};
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::error::{IngestError, Result};
use crate::reader::{CsvOptions, Row, ZipSource};
use crate::schema::Schema;
use crate::schema::types::{DateFormatConfig, parse_date_string};
use crate::utils::html::find_link;
use crate::utils::text::capitalize;

const BASE_URL: &str = "http://download.companieshouse.gov.uk/en_output.html";
const PSC_URL: &str = "http://download.companieshouse.gov.uk/en_pscdata.html";

/// PSC statement kind -> schema; `None` marks kinds that are skipped
const KINDS: &[(&str, Option<Schema>)] = &[
    ("individual-person-with-significant-control", Some(Schema::Person)),
    ("individual-beneficial-owner", Some(Schema::Person)),
    ("corporate-entity-person-with-significant-control", Some(Schema::Company)),
    ("corporate-entity-beneficial-owner", Some(Schema::Company)),
    ("legal-person-person-with-significant-control", Some(Schema::Organization)),
    ("legal-person-beneficial-owner", Some(Schema::Organization)),
    ("super-secure-person-with-significant-control", None),
    ("super-secure-beneficial-owner", None),
    ("persons-with-significant-control-statement", None),
    ("exemptions", None),
];

/// Base data columns carrying filing deadlines and counters, not entity data
const IGNORED_COLUMNS: &[&str] = &[
    "URI",
    "Accounts.AccountRefDay",
    "Accounts.AccountRefMonth",
    "Accounts.NextDueDate",
    "Accounts.LastMadeUpDate",
    "Accounts.AccountCategory",
    "Returns.NextDueDate",
    "Returns.LastMadeUpDate",
    "Mortgages.NumMortCharges",
    "Mortgages.NumMortOutstanding",
    "Mortgages.NumMortPartSatisfied",
    "Mortgages.NumMortSatisfied",
    "LimitedPartnerships.NumGenPartners",
    "LimitedPartnerships.NumLimPartners",
    "ConfStmtNextDueDate",
    "ConfStmtLastMadeUpDate",
];

static DATES: LazyLock<DateFormatConfig> = LazyLock::new(|| DateFormatConfig::with_formats(&["%d/%m/%Y"]));

pub struct GbCohPsc;

fn company_id(company_nr: &str) -> String {
    make_oc_company_id("gb", company_nr)
}

fn parse_date(text: Option<String>) -> Option<NaiveDate> {
    parse_date_string(text?.as_str(), &DATES)
}

/// SIC texts look like `62012 - Business and domestic software development`
#[must_use]
pub fn clean_sector(text: &str) -> Option<String> {
    let (_, sector) = text.split_once(" - ")?;
    let sector = sector.trim();
    (!sector.is_empty()).then(|| sector.to_string())
}

/// How a PSC record kind is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PscKind {
    Entity(Schema),
    Skipped,
    Unknown,
}

fn psc_kind(kind: &str) -> PscKind {
    match KINDS.iter().find(|(k, _)| *k == kind) {
        Some((_, Some(schema))) => PscKind::Entity(*schema),
        Some((_, None)) => PscKind::Skipped,
        None => PscKind::Unknown,
    }
}

/// Resolve a local resource, or find its link on a product page and fetch it
fn discover_resource(context: &Context, name: &str, page_url: &str, needle: &str) -> Result<std::path::PathBuf> {
    if let Ok(path) = context.get_resource_path(name) {
        return Ok(path);
    }
    let page = context.fetch_text(page_url)?;
    let Some(url) = find_link(&page, page_url, needle)? else {
        return Err(IngestError::Data(format!("no {needle} link on {page_url}")));
    };
    context.fetch_resource(name, &url)
}

pub(crate) fn parse_base_row(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(company_nr) = row.pop("CompanyNumber") else {
        log::warn!("[{}] Company row without number: {:?}", context.name(), row.get("CompanyName"));
        return Ok(());
    };
    let mut entity = context.make(Schema::Company);
    entity.id = Some(company_id(&company_nr));
    entity.add("name", row.pop("CompanyName"))?;
    entity.add("registrationNumber", company_nr.as_str())?;
    entity.add("status", row.pop("CompanyStatus"))?;
    entity.add("legalForm", row.pop("CompanyCategory"))?;
    entity.add("country", row.pop("CountryOfOrigin"))?;
    entity.add("jurisdiction", "gb")?;
    entity.add("opencorporatesUrl", oc_url("gb", &company_nr))?;

    for i in 1..=4 {
        let sector = row.pop(&format!("SICCode.SicText_{i}"));
        entity.add("sector", sector.as_deref().and_then(clean_sector))?;
    }
    entity.add("incorporationDate", parse_date(row.pop("IncorporationDate")))?;
    entity.add("dissolutionDate", parse_date(row.pop("DissolutionDate")))?;

    for i in 1..=10 {
        row.pop(&format!("PreviousName_{i}.CONDATE"));
        entity.add("previousName", row.pop(&format!("PreviousName_{i}.CompanyName")))?;
    }

    let country = row.pop("RegAddress.Country");
    let address = AddressParts {
        street: row.pop("RegAddress.AddressLine1"),
        street2: row.pop("RegAddress.AddressLine2"),
        street3: row.pop("RegAddress.CareOf"),
        po_box: row.pop("RegAddress.POBox"),
        postal_code: row.pop("RegAddress.PostCode"),
        region: row.pop("RegAddress.County"),
        city: row.pop("RegAddress.PostTown"),
        country_code: country.is_none().then(|| "gb".to_string()),
        country,
        ..Default::default()
    };
    attach_address(context, &mut entity, &address)?;

    audit_row(context.name(), &row, IGNORED_COLUMNS);
    context.emit(&entity)
}

/// Remove a scalar member and render it as text
fn take_str(data: &mut Map<String, Value>, key: &str) -> Option<String> {
    match data.remove(key)? {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Remove an object member; missing or non-object members yield an empty map
fn take_object(data: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match data.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn address_parts(mut address: Map<String, Value>) -> AddressParts {
    AddressParts {
        remarks: take_str(&mut address, "premises"),
        street: take_str(&mut address, "address_line_1"),
        street2: take_str(&mut address, "address_line_2"),
        street3: take_str(&mut address, "care_of"),
        po_box: take_str(&mut address, "po_box"),
        postal_code: take_str(&mut address, "postal_code"),
        region: take_str(&mut address, "region"),
        city: take_str(&mut address, "locality"),
        country: take_str(&mut address, "country"),
        ..Default::default()
    }
}

pub(crate) fn parse_psc_record(context: &mut Context, record: Value) -> Result<()> {
    let Value::Object(mut record) = record else {
        return Err(IngestError::Data("PSC record is not an object".to_string()));
    };
    let Some(company_nr) = take_str(&mut record, "company_number") else {
        log::warn!("[{}] No company number: {record:?}", context.name());
        return Ok(());
    };
    let mut data = take_object(&mut record, "data");
    data.remove("etag");
    let self_link = take_object(&mut data, "links")
        .get("self")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let psc_id = self_link.rsplit('/').next().unwrap_or_default().to_string();
    let kind = take_str(&mut data, "kind").unwrap_or_default();
    let schema = match psc_kind(&kind) {
        PscKind::Entity(schema) => schema,
        PscKind::Skipped => return Ok(()),
        PscKind::Unknown => {
            log::warn!(
                "[{}] Unknown kind of PSC: {kind:?} ({:?})",
                context.name(),
                data.get("name")
            );
            return Ok(());
        }
    };

    let name = take_str(&mut data, "name");
    let dob = take_object(&mut data, "date_of_birth");
    let birth_date = match (dob.get("year").and_then(Value::as_u64), dob.get("month").and_then(Value::as_u64)) {
        (Some(year), Some(month)) => Some(format!("{year}-{month:02}")),
        _ => None,
    };

    let mut psc = context.make(schema);
    let mut link = context.make(Schema::Ownership);
    if psc_id.is_empty() {
        // Without a self link the record is keyed by its content
        let key = [
            company_nr.as_str(),
            kind.as_str(),
            name.as_deref().unwrap_or_default(),
            birth_date.as_deref().unwrap_or_default(),
        ];
        psc.id = context.make_id(std::iter::once("psc").chain(key));
        link.id = context.make_id(std::iter::once("stmt").chain(key));
    } else {
        psc.id = context.make_slug(["psc", company_nr.as_str(), psc_id.as_str()]);
        link.id = context.make_slug(["stmt", company_nr.as_str(), psc_id.as_str()]);
    }
    psc.add("name", name)?;
    let nationality = take_str(&mut data, "nationality");
    if psc.is_a(Schema::Person) {
        psc.add_quiet("nationality", nationality);
    } else {
        psc.add_quiet("jurisdiction", nationality);
    }
    psc.add("country", take_str(&mut data, "country_of_residence"))?;

    let mut names = take_object(&mut data, "name_elements");
    psc.add_quiet("firstName", take_str(&mut names, "forename"));
    psc.add_quiet("middleName", take_str(&mut names, "middle_name"));
    psc.add_quiet("lastName", take_str(&mut names, "surname"));
    psc.add_quiet("title", take_str(&mut names, "title"));

    psc.add_quiet("birthDate", birth_date);

    for field in ["address", "principal_office_address"] {
        let parts = address_parts(take_object(&mut data, field));
        attach_address(context, &mut psc, &parts)?;
    }

    let mut ident = take_object(&mut data, "identification");
    psc.add_quiet("registrationNumber", take_str(&mut ident, "registration_number"));
    psc.add_quiet("legalForm", take_str(&mut ident, "legal_form"));
    psc.add_quiet("legalForm", take_str(&mut ident, "legal_authority"));
    psc.add_quiet("jurisdiction", take_str(&mut ident, "country_registered"));
    psc.add_quiet("jurisdiction", take_str(&mut ident, "place_registered"));

    link.add("owner", &psc)?;
    link.add("asset", company_id(&company_nr))?;
    link.add("startDate", take_str(&mut data, "notified_on"))?;
    link.add("endDate", take_str(&mut data, "ceased_on"))?;

    if let Some(Value::Array(natures)) = data.remove("natures_of_control") {
        for nature in natures.iter().filter_map(Value::as_str) {
            link.add("role", capitalize(&nature.replace('-', " ")))?;
        }
    }

    if data.remove("is_sanctioned").and_then(|v| v.as_bool()).unwrap_or(false) {
        psc.add("topics", "sanction")?;
    }

    audit_json(context.name(), &data, &[]);
    context.emit(&psc)?;
    context.emit(&link)
}

fn parse_base_data(context: &mut Context, source: &mut ZipSource) -> Result<()> {
    let options = CsvOptions::default().with_trimmed_headers();
    for name in source.names() {
        for_each_zip_row(context, source, &name, &options, parse_base_row)?;
    }
    Ok(())
}

fn parse_psc_data(context: &mut Context, source: &mut ZipSource) -> Result<()> {
    for name in source.names() {
        let mut progress = context.progress(&name);
        source.for_each_line(&name, |line| {
            let line = line.trim();
            if line.is_empty() {
                return Ok(());
            }
            progress.tick();
            parse_psc_record(&mut *context, serde_json::from_str(line)?)
        })?;
        progress.finish();
    }
    Ok(())
}

impl Dataset for GbCohPsc {
    fn name(&self) -> &'static str {
        "gb_coh_psc"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "UK People with Significant Control")
            .with_prefix("gb-coh")
            .with_url("http://download.companieshouse.gov.uk/en_pscdata.html")
            .with_summary("Companies registered in the UK and the people and companies that control them")
            .with_publisher(
                "Companies House",
                Some("https://www.gov.uk/government/organisations/companies-house"),
                Some("gb"),
            )
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let base_path = discover_resource(context, "base_data.zip", BASE_URL, "BasicCompanyDataAsOneFile")?;
        let psc_path = discover_resource(
            context,
            "psc_data.zip",
            PSC_URL,
            "persons-with-significant-control-snapshot",
        )?;
        parse_base_data(context, &mut ZipSource::open(&base_path)?)?;
        parse_psc_data(context, &mut ZipSource::open(&psc_path)?)
    }
}
