//! Moldova State Register of legal units.
//!
//! Published on the national CKAN portal as an XLSX workbook. The download
//! link is discovered from the dataset page and then the resource page. The
//! `Company` sheet starts with a few title rows before the real header.

use std::path::PathBuf;

use super::Dataset;
use super::common::make_oc_company_id;
use crate::audit::audit_row;
use crate::config::DatasetMetadata;
use crate::context::Context;
use crate::entity::Entity;
use crate::entity::ids::slugify;
use crate::error::{IngestError, Result};
use crate::reader::{Row, read_sheet_rows};
use crate::schema::Schema;
use crate::utils::html::find_links;

const SHEET: &str = "Company";

/// Cell that marks the header row
const HEADER_MARKER: &str = "Denumirea completă";

/// Columns that are known but not mapped to properties
const IGNORED_COLUMNS: &[&str] = &["nr"];

pub struct MdCompanies;

fn fetch_page(context: &Context, name: &str, url: &str) -> Result<String> {
    let path = context.fetch_resource(name, url)?;
    Ok(std::fs::read_to_string(path)?)
}

/// Follow the CKAN dataset page to the resource page to the workbook link
fn read_ckan(context: &Context) -> Result<String> {
    let Some(dataset_url) = context.dataset().url.clone() else {
        return Err(IngestError::Data("no dataset url".to_string()));
    };
    let page = fetch_page(context, "dataset.html", &dataset_url)?;
    // The last resource listed is the most recent export
    let Some(resource_url) = find_links(&page, &dataset_url)?
        .into_iter()
        .filter(|link| link.contains("/resource/") && !link.contains("/download/"))
        .last()
    else {
        return Err(IngestError::Data("no resource URL on data catalog page".to_string()));
    };

    let page = fetch_page(context, "resource.html", &resource_url)?;
    find_links(&page, &resource_url)?
        .into_iter()
        .find(|link| link.contains("/download/") || link.to_lowercase().ends_with(".xlsx"))
        .ok_or_else(|| IngestError::Data("no data URL on data resource page".to_string()))
}

fn workbook_path(context: &Context) -> Result<PathBuf> {
    if let Ok(path) = context.get_resource_path("data.xlsx") {
        return Ok(path);
    }
    let data_url = read_ckan(context)?;
    context.fetch_resource("data.xlsx", &data_url)
}

/// Split a cell listing several people
fn split_names(cell: Option<String>) -> Vec<String> {
    cell.map(|text| {
        text.split([',', ';', '\n'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn make_party(context: &Context, schema: Schema, name: &str, company: &Entity) -> Result<Entity> {
    let mut party = context.make(schema);
    party.id = context.make_id([name, company.id.as_deref().unwrap_or_default()]);
    party.add("name", name)?;
    Ok(party)
}

pub(crate) fn parse_company(context: &mut Context, mut row: Row) -> Result<()> {
    let name = row.pop("denumirea-completa");
    let reg_nr = row.pop("idno-cod-fiscal");
    let mut company = context.make(Schema::Company);
    company.id = match &reg_nr {
        Some(nr) => Some(make_oc_company_id("md", nr)),
        None => context.make_slug(["company", name.as_deref().unwrap_or_default()]),
    };
    if company.id.is_none() {
        return Ok(());
    }
    company.add("name", name)?;
    company.add("registrationNumber", reg_nr)?;
    company.add("legalForm", row.pop("forma-org-jur"))?;
    company.add("incorporationDate", row.pop("data-inregistrarii"))?;
    company.add("dissolutionDate", row.pop("data-lichidarii"))?;
    company.add("status", row.pop("statutul"))?;
    company.add("address", row.pop("adresa"))?;
    company.add("sector", split_names(row.pop("genuri-de-activitate-nelicentiate")))?;
    company.add("sector", split_names(row.pop("genuri-de-activitate-licentiate")))?;
    company.add("jurisdiction", "md")?;
    context.emit(&company)?;

    for director_name in split_names(row.pop("lista-conducatorilor")) {
        let director = make_party(context, Schema::Person, &director_name, &company)?;
        let mut rel = context.make(Schema::Directorship);
        rel.id = context.make_id(["directorship", director.id.as_deref().unwrap_or_default()]);
        rel.add("director", &director)?;
        rel.add("organization", &company)?;
        rel.add("role", "director")?;
        context.emit(&director)?;
        context.emit(&rel)?;
    }
    for founder_name in split_names(row.pop("lista-fondatorilor")) {
        let founder = make_party(context, Schema::LegalEntity, &founder_name, &company)?;
        let mut rel = context.make(Schema::Ownership);
        rel.id = context.make_id(["ownership", founder.id.as_deref().unwrap_or_default()]);
        rel.add("owner", &founder)?;
        rel.add("asset", &company)?;
        rel.add("role", "founder")?;
        context.emit(&founder)?;
        context.emit(&rel)?;
    }

    audit_row(context.name(), &row, IGNORED_COLUMNS);
    Ok(())
}

/// Skip the title rows, then map each data row by the slugged header
pub(crate) fn parse_rows(context: &mut Context, rows: Vec<Vec<Option<String>>>) -> Result<usize> {
    let mut header: Option<Vec<Option<String>>> = None;
    let mut progress = context.progress(SHEET);
    for cells in rows {
        let Some(columns) = header.as_ref() else {
            if cells.iter().flatten().any(|cell| cell == HEADER_MARKER) {
                header = Some(cells.iter().map(|c| c.as_deref().and_then(slugify)).collect());
            }
            continue;
        };
        let mut row = Row::new();
        for (column, cell) in columns.iter().zip(cells) {
            if let (Some(column), Some(cell)) = (column, cell) {
                row.insert(column.as_str(), cell);
            }
        }
        if row.is_empty() {
            continue;
        }
        progress.tick();
        parse_company(context, row)?;
    }
    if header.is_none() {
        return Err(IngestError::Data(format!("no header row in sheet {SHEET}")));
    }
    Ok(progress.finish())
}

impl Dataset for MdCompanies {
    fn name(&self) -> &'static str {
        "md_companies"
    }

    fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata::new(self.name(), "Moldova State Register of Legal Units")
            .with_prefix("md")
            .with_url("https://dataset.gov.md/ro/dataset/11736-date-din-registrul-de-stat-al-unitatilor-de-drept-privind-intreprinderile-inregistrate-in-repu")
            .with_summary("Companies registered in the Republic of Moldova, their directors and founders")
            .with_publisher("Agenția Servicii Publice", Some("https://www.asp.gov.md/"), Some("md"))
    }

    fn parse(&self, context: &mut Context) -> Result<()> {
        let path = workbook_path(context)?;
        let rows = read_sheet_rows(&path, SHEET)?;
        parse_rows(context, rows)?;
        Ok(())
    }
}
