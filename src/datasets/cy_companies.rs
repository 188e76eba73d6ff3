//! Cyprus Department of Registrar of Companies and Intellectual Property.
//!
//! The open data export is a zip of three CSV tables (organisations, their
//! officials and registered offices), each with a UTF-8 byte order mark.
//! Company ids follow the OpenCorporates scheme, which prefixes the register
//! number with a letter code per organisation type.

use std::sync::LazyLock;

use chrono::NaiveDate;

use super::Dataset;
use super::common::{for_each_zip_row, oc_url};
use crate::audit::audit_row;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::error::Result;
use crate::reader::{CsvOptions, Row, ZipSource};
use crate::schema::Schema;
use crate::schema::types::{DateFormatConfig, parse_date_string};
use crate::utils::text::join_text;

const URL: &str = "https://www.data.gov.cy/node/4016/dataset/download";

/// Organisation type code in the register -> OpenCorporates prefix
const TYPES: &[(&str, &str)] = &[("C", "HE"), ("P", "S"), ("O", "AE"), ("N", "BN"), ("B", "B")];

/// Header value of a trading-name block embedded in the organisations table
const TRADING_NAME: &str = "Εμπορική Επωνυμία";

static DATES: LazyLock<DateFormatConfig> = LazyLock::new(|| DateFormatConfig::with_formats(&["%d/%m/%Y"]));

pub struct CyCompanies;

fn oc_type(org_type: &str) -> Option<&'static str> {
    TYPES.iter().find(|(code, _)| *code == org_type).map(|(_, oc)| *oc)
}

fn parse_date(text: Option<String>) -> Option<NaiveDate> {
    parse_date_string(text?.as_str(), &DATES)
}

/// `oc-companies-cy-<oc type><nr>`, lowercased
#[must_use]
pub fn company_id(org_type: &str, reg_nr: &str) -> Option<String> {
    let oc = oc_type(org_type)?;
    Some(format!("oc-companies-cy-{oc}{reg_nr}").to_lowercase())
}

fn address_id(seq_nr: Option<String>) -> Option<String> {
    seq_nr.map(|seq| format!("cy-address-seq-{seq}"))
}

fn parse_organisation(context: &mut Context, mut row: Row) -> Result<()> {
    let org_type = row.pop("ORGANISATION_TYPE_CODE").unwrap_or_default();
    let reg_nr = row.pop("REGISTRATION_NO").unwrap_or_default();
    if org_type.is_empty() || org_type == TRADING_NAME {
        return Ok(());
    }
    let Some(oc) = oc_type(&org_type) else {
        log::warn!("[{}] Unknown organisation type {org_type:?} ({reg_nr})", context.name());
        return Ok(());
    };

    let mut entity = context.make(Schema::Company);
    entity.id = company_id(&org_type, &reg_nr);
    entity.add("name", row.pop("ORGANISATION_NAME"))?;
    entity.add("status", row.pop("ORGANISATION_STATUS"))?;
    // Overseas companies are registered here but incorporated elsewhere
    if org_type == "O" {
        entity.add("country", "cy")?;
    } else {
        entity.add("jurisdiction", "cy")?;
    }
    let oc_id = format!("{oc}{reg_nr}");
    entity.add("opencorporatesUrl", oc_url("cy", &oc_id))?;
    entity.add("registrationNumber", oc_id)?;
    entity.add("registrationNumber", format!("{org_type}{reg_nr}"))?;

    let legal_form = match row.pop("ORGANISATION_SUB_TYPE") {
        Some(sub_type) => join_text([row.pop("ORGANISATION_TYPE").unwrap_or_default(), sub_type], " - "),
        None => row.pop("ORGANISATION_TYPE"),
    };
    entity.add("legalForm", legal_form)?;
    entity.add("incorporationDate", parse_date(row.pop("REGISTRATION_DATE")))?;
    entity.add("modifiedAt", parse_date(row.pop("ORGANISATION_STATUS_DATE")))?;
    entity.add("addressEntity", address_id(row.pop("ADDRESS_SEQ_NO")))?;

    audit_row(context.name(), &row, &[]);
    context.emit(&entity)
}

fn parse_official(context: &mut Context, mut row: Row) -> Result<()> {
    let org_type = row.pop("ORGANISATION_TYPE_CODE").unwrap_or_default();
    let Some(company) = company_id(&org_type, row.get("REGISTRATION_NO").unwrap_or_default()) else {
        return Ok(());
    };
    let reg_nr = row.pop("REGISTRATION_NO").unwrap_or_default();
    let name = row.pop("PERSON_OR_ORGANISATION_NAME");
    let position = row.pop("OFFICIAL_POSITION");
    let name_part = name.clone().unwrap_or_default();

    let mut official = context.make(Schema::LegalEntity);
    official.id = context.make_id([org_type.as_str(), reg_nr.as_str(), name_part.as_str()]);
    official.add("name", name)?;

    let mut link = context.make(Schema::Directorship);
    link.id = context.make_id([
        "Directorship",
        org_type.as_str(),
        reg_nr.as_str(),
        name_part.as_str(),
        position.as_deref().unwrap_or_default(),
    ]);
    link.add("organization", company)?;
    link.add("director", &official)?;
    link.add("role", position)?;

    audit_row(context.name(), &row, &[]);
    context.emit(&official)?;
    context.emit(&link)
}

fn parse_address(context: &mut Context, mut row: Row) -> Result<()> {
    let Some(id) = address_id(row.pop("ADDRESS_SEQ_NO")) else {
        return Ok(());
    };
    let mut address = context.make(Schema::Address);
    address.id = Some(id);
    address.add("country", "cy")?;
    let street = row.pop("STREET");
    let building = row.pop("BUILDING");
    let territory = row.pop("TERRITORY");
    address.add("street", street.as_deref())?;
    address.add("remarks", building.as_deref())?;
    address.add(
        "full",
        join_text([building, street, territory].into_iter().flatten(), ", "),
    )?;
    audit_row(context.name(), &row, &[]);
    context.emit(&address)
}

impl Dataset for CyCompanies {
    fn name(&self) -> &'static str {
        "cy_companies"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "Cyprus Companies and Corporate Officers")
            .with_prefix("cy")
            .with_url("https://www.data.gov.cy/node/4016")
            .with_data_url(URL)
            .with_summary("Registered companies, partnerships and business names in Cyprus, with their officers")
            .with_publisher(
                "Department of Registrar of Companies and Intellectual Property",
                Some("https://www.companies.gov.cy/"),
                Some("cy"),
            )
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let path = context.fetch_resource("data.zip", URL)?;
        let mut source = ZipSource::open(&path)?;
        let options = CsvOptions::default();
        for name in source.names() {
            let base = name.rsplit('/').next().unwrap_or(&name);
            if base.starts_with("organisations_") {
                for_each_zip_row(context, &mut source, &name, &options, parse_organisation)?;
            } else if base.starts_with("organisation_officials_") {
                for_each_zip_row(context, &mut source, &name, &options, parse_official)?;
            } else if base.starts_with("registered_office_") {
                for_each_zip_row(context, &mut source, &name, &options, parse_address)?;
            } else {
                log::debug!("[{}] Skipping archive member {name}", context.name());
            }
        }
        Ok(())
    }
}
