//! CorpWatch API tables.
//!
//! A set of tab-separated tables derived from SEC filings, each keyed on the
//! CorpWatch company id (`cw_id`). Every table emits fragments under the same
//! company ids; aggregation merges them downstream. The literal `NULL` marks
//! missing values.

use super::Dataset;
use super::common::for_each_file_row;
use crate::address::AddressParts;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::entity::Entity;
use crate::error::Result;
use crate::reader::{CsvOptions, Row};
use crate::schema::Schema;
use crate::utils::text::{clean_null, join_text};

/// Directory of the unpacked table dump inside the resource directory
const BASE_PATH: &str = "src/corpwatch_api_tables_csv";

type RowHandler = fn(&mut Context, Row) -> Result<()>;

/// Tables in parse order
const TABLES: &[(&str, RowHandler)] = &[
    ("companies.csv", parse_companies),
    ("company_info.csv", parse_company_info),
    ("company_names.csv", parse_company_names),
    ("company_locations.csv", parse_company_locations),
    ("company_relations.csv", parse_company_relations),
    ("relationships.csv", parse_relationships),
];

pub struct UsCorpwatch;

/// Pop a column, treating `NULL` as missing
fn pop_clean(row: &mut Row, key: &str) -> Option<String> {
    clean_null(row.pop(key).as_deref())
}

fn make_company(context: &Context, cw_id: Option<&str>, name: Option<String>) -> Result<Entity> {
    let mut company = context.make(Schema::Company);
    company.id = context.make_slug(cw_id);
    company.add("name", name)?;
    Ok(company)
}

pub(crate) fn parse_companies(context: &mut Context, mut row: Row) -> Result<()> {
    let name = pop_clean(&mut row, "company_name");
    let company = make_company(context, row.get("cw_id"), name)?;
    context.emit(&company)
}

pub(crate) fn parse_company_info(context: &mut Context, mut row: Row) -> Result<()> {
    let name = pop_clean(&mut row, "company_name");
    let mut company = make_company(context, row.get("cw_id"), name)?;
    company.add("sector", pop_clean(&mut row, "industry_name"))?;
    company.add("sector", pop_clean(&mut row, "sector_name"))?;
    company.add("registrationNumber", pop_clean(&mut row, "irs_number"))?;
    context.emit(&company)
}

pub(crate) fn parse_company_names(context: &mut Context, mut row: Row) -> Result<()> {
    let mut company = make_company(context, row.get("cw_id"), None)?;
    company.add("country", pop_clean(&mut row, "country_code"))?;
    let name = pop_clean(&mut row, "company_name");
    if row.get("source") == Some("cik_former_name") {
        company.add("previousName", name)?;
    } else {
        company.add("name", name)?;
    }
    context.emit(&company)
}

pub(crate) fn parse_company_locations(context: &mut Context, mut row: Row) -> Result<()> {
    let mut company = make_company(context, row.get("cw_id"), None)?;
    let country_code = pop_clean(&mut row, "country_code").map(|cc| cc.to_lowercase());
    company.add("country", country_code.as_deref())?;
    let street = join_text(
        [pop_clean(&mut row, "street_1"), pop_clean(&mut row, "street_2")]
            .into_iter()
            .flatten(),
        ", ",
    );
    let parts = AddressParts {
        street,
        postal_code: pop_clean(&mut row, "postal_code"),
        city: pop_clean(&mut row, "city"),
        state: pop_clean(&mut row, "state"),
        country_code,
        ..AddressParts::default()
    };
    company.add("address", parts.format_line())?;
    context.emit(&company)
}

pub(crate) fn parse_company_relations(context: &mut Context, row: Row) -> Result<()> {
    let source = make_company(context, row.get("source_cw_id"), None)?;
    let mut target = make_company(context, row.get("target_cw_id"), None)?;
    if source.id.is_none() || target.id.is_none() {
        return Ok(());
    }
    target.add("parent", &source)?;
    context.emit(&source)?;
    context.emit(&target)
}

pub(crate) fn parse_relationships(context: &mut Context, mut row: Row) -> Result<()> {
    if row.get("ignore_record") != Some("0") {
        return Ok(());
    }
    let year = pop_clean(&mut row, "year");
    let percentage = pop_clean(&mut row, "percent");
    if year.is_none() && percentage.is_none() {
        return Ok(());
    }
    let (Some(parent_id), Some(child_id)) = (row.pop("parent_cw_id"), row.pop("cw_id")) else {
        return Ok(());
    };
    let parent = make_company(context, Some(&parent_id), None)?;
    let child = make_company(context, Some(&child_id), None)?;
    let mut ownership = context.make(Schema::Ownership);
    ownership.id = context.make_slug([
        "ownership",
        parent.id.as_deref().unwrap_or_default(),
        child.id.as_deref().unwrap_or_default(),
    ]);
    ownership.add("owner", &parent)?;
    ownership.add("asset", &child)?;
    ownership.add("percentage", percentage)?;
    ownership.add("date", year)?;
    context.emit(&parent)?;
    context.emit(&child)?;
    context.emit(&ownership)
}

impl Dataset for UsCorpwatch {
    fn name(&self) -> &'static str {
        "us_corpwatch"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "CorpWatch Company Relationships")
            .with_prefix("us-cw")
            .with_url("https://api.corpwatch.org/")
            .with_summary("US companies and their subsidiaries as reported in SEC filings")
            .with_publisher("CorpWatch", Some("https://corpwatch.org/"), Some("us"))
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let options = CsvOptions::default().with_delimiter(b'\t').without_quoting();
        for (table, handler) in TABLES {
            let path = context.get_resource_path(&format!("{BASE_PATH}/{table}"))?;
            log::info!("[{}] Parsing {}", context.name(), path.display());
            for_each_file_row(context, &path, &options, *handler)?;
        }
        Ok(())
    }
}
