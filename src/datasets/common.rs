//! Helpers shared by several importers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::context::Context;
use crate::error::Result;
use crate::error::util::validate_file;
use crate::reader::{CsvOptions, Row, ZipSource, read_csv_rows};
use crate::schema::types::countries::to_code;

/// OpenCorporates-style company id: `oc-companies-<cc>-<nr>`.
///
/// The jurisdiction may be a country name or code. When it cannot be
/// resolved the id falls back to `oc-companies-<nr>` and a warning is logged.
#[must_use]
pub fn make_oc_company_id(jurisdiction: &str, company_nr: &str) -> String {
    let nr = company_nr.trim().to_lowercase();
    match to_code(jurisdiction) {
        Some(cc) => format!("oc-companies-{cc}-{nr}"),
        None => {
            log::warn!("Not a valid jurisdiction: {jurisdiction:?}");
            format!("oc-companies-{nr}")
        }
    }
}

/// OpenCorporates page for a company
#[must_use]
pub fn oc_url(country_code: &str, company_nr: &str) -> String {
    format!(
        "https://opencorporates.com/companies/{}/{}",
        country_code.to_lowercase(),
        company_nr.trim()
    )
}

/// Stream the rows of a delimited zip member into `handler`, counting progress
pub fn for_each_zip_row<F>(
    context: &mut Context,
    source: &mut ZipSource,
    member: &str,
    options: &CsvOptions,
    mut handler: F,
) -> Result<usize>
where
    F: FnMut(&mut Context, Row) -> Result<()>,
{
    let mut progress = context.progress(member);
    source.for_each_csv_row(member, options, |row| {
        progress.tick();
        handler(&mut *context, row)
    })?;
    Ok(progress.finish())
}

/// Stream the rows of a delimited file on disk into `handler`, counting progress
pub fn for_each_file_row<F>(
    context: &mut Context,
    path: &Path,
    options: &CsvOptions,
    mut handler: F,
) -> Result<usize>
where
    F: FnMut(&mut Context, Row) -> Result<()>,
{
    validate_file(path, "delimited source table")?;
    let label = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    let mut progress = context.progress(&label);
    let reader = BufReader::new(File::open(path)?);
    read_csv_rows(reader, options, |row| {
        progress.tick();
        handler(&mut *context, row)
    })?;
    Ok(progress.finish())
}
