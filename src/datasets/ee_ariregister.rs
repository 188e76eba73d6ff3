//! Estonian e-Business Register (äriregister).
//!
//! One zipped `;`-separated table of registered holders. The entity schema
//! follows the legal form: sole traders become people, public institutions
//! public bodies, and everything unlisted a company.

use std::sync::LazyLock;

use chrono::NaiveDate;

use super::Dataset;
use super::common::for_each_zip_row;
use crate::audit::audit_row;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::error::Result;
use crate::reader::{CsvOptions, Row, ZipSource};
use crate::schema::Schema;
use crate::schema::types::{DateFormatConfig, parse_date_string};

const URL: &str = "https://avaandmed.rik.ee/andmed/ARIREGISTER/ariregister_csv.zip";

/// Archive members holding the holder table start with this
const MEMBER_PREFIX: &str = "ettevotja_rekvisiidid";

/// Legal form -> schema; forms not listed are companies
const TYPES: &[(&str, Schema)] = &[
    // Self-employed person
    ("Füüsilisest isikust ettevõtja", Schema::Person),
    ("Kohaliku omavalitsuse asutus", Schema::PublicBody),
    // Non-profit association
    ("Mittetulundusühing", Schema::Organization),
    ("Täidesaatva riigivõimu asutus või riigi muu institutsioon", Schema::PublicBody),
    // Foundation
    ("Sihtasutus", Schema::Organization),
];

/// Columns carrying address detail already covered by the normalised address
const IGNORED_COLUMNS: &[&str] = &[
    "ettevotja_oigusliku_vormi_alaliik",
    "ettevotja_staatus",
    "ettevotja_aadress",
    "asukoht_ettevotja_aadressis",
    "asukoha_ehak_kood",
    "asukoha_ehak_tekstina",
    "indeks_ettevotja_aadressis",
    "ads_adr_id",
    "ads_ads_oid",
];

static DATES: LazyLock<DateFormatConfig> = LazyLock::new(|| DateFormatConfig::with_formats(&["%d.%m.%Y"]));

pub struct EeAriregister;

fn legal_form_schema(legal_form: Option<&str>) -> Schema {
    legal_form
        .and_then(|form| TYPES.iter().find(|(name, _)| *name == form))
        .map_or(Schema::Company, |(_, schema)| *schema)
}

fn parse_date(text: Option<String>) -> Option<NaiveDate> {
    parse_date_string(text?.as_str(), &DATES)
}

/// Prefer the VAT number, else the register code
fn holder_id(context: &Context, row: &Row) -> Option<String> {
    if let Some(vat) = row.get("kmkr_nr") {
        return context.make_slug(["vat", vat]);
    }
    context.make_slug(row.get("ariregistri_kood"))
}

pub(crate) fn parse_row(context: &mut Context, mut row: Row) -> Result<()> {
    let legal_form = row.pop("ettevotja_oiguslik_vorm");
    let mut entity = context.make(legal_form_schema(legal_form.as_deref()));
    entity.id = holder_id(context, &row);
    if entity.id.is_none() {
        log::warn!("[{}] No id for holder {:?}", context.name(), row.get("nimi"));
        return Ok(());
    }
    entity.add("name", row.pop("nimi"))?;
    entity.add("legalForm", legal_form)?;
    entity.add("registrationNumber", row.pop("ariregistri_kood"))?;
    entity.add("vatCode", row.pop("kmkr_nr"))?;
    entity.add("incorporationDate", parse_date(row.pop("ettevotja_esmakande_kpv")))?;
    entity.add("address", row.pop("ads_normaliseeritud_taisaadress"))?;
    entity.add("sourceUrl", row.pop("teabesysteemi_link"))?;
    entity.add("status", row.pop("ettevotja_staatus_tekstina"))?;
    entity.add("jurisdiction", "ee")?;

    audit_row(context.name(), &row, IGNORED_COLUMNS);
    context.emit(&entity)
}

impl Dataset for EeAriregister {
    fn name(&self) -> &'static str {
        "ee_ariregister"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "Estonia e-Business Register (E-äriregister)")
            .with_prefix("ee")
            .with_url("https://avaandmed.ariregister.rik.ee/en")
            .with_data_url(URL)
            .with_summary("Companies, non-profits and sole traders registered in Estonia")
            .with_publisher("Registrite ja Infosüsteemide Keskus", Some("https://www.rik.ee/"), Some("ee"))
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let path = context.fetch_resource("data.zip", URL)?;
        let mut source = ZipSource::open(&path)?;
        let options = CsvOptions::default().with_delimiter(b';');
        for name in source.names() {
            let base = name.rsplit('/').next().unwrap_or(&name);
            if base.starts_with(MEMBER_PREFIX) {
                for_each_zip_row(context, &mut source, &name, &options, parse_row)?;
            }
        }
        Ok(())
    }
}
