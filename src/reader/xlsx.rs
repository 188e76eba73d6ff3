//! Spreadsheet reading.

use std::path::Path;

use calamine::{Data, DataType, Reader, open_workbook_auto};

use crate::error::Result;
use crate::error::util::validate_file;
use crate::schema::types::{clean_date, iso_date};

/// Render one cell as text; `None` for empty and error cells
#[must_use]
pub fn cell_to_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => iso_date(date),
            None => {
                let raw = cell.to_string();
                clean_date(&raw).unwrap_or(raw)
            }
        },
        // Whole numbers are usually registration codes
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Read all rows of a worksheet as optional strings
///
/// # Arguments
/// * `path` - An `.xlsx`, `.xls` or `.ods` workbook
/// * `sheet` - Worksheet name
pub fn read_sheet_rows(path: &Path, sheet: &str) -> Result<Vec<Vec<Option<String>>>> {
    validate_file(path, "spreadsheet")?;
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet)?;
    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(rows)
}
