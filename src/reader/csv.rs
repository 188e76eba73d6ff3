//! Delimited text reading.

use std::io::Read;

use super::Row;
use crate::error::Result;

/// How a delimited file is laid out
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field separator
    pub delimiter: u8,
    /// Strip whitespace around header names
    pub trim_headers: bool,
    /// Honour `"` quoting; off for tab dumps that contain stray quotes
    pub quoting: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_headers: false,
            quoting: true,
        }
    }
}

impl CsvOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_trimmed_headers(mut self) -> Self {
        self.trim_headers = true;
        self
    }

    #[must_use]
    pub fn without_quoting(mut self) -> Self {
        self.quoting = false;
        self
    }
}

/// Stream rows of a delimited file into `callback`.
///
/// The first record is the header. A UTF-8 byte order mark on it is removed
/// and invalid UTF-8 anywhere is replaced rather than rejected. Short rows
/// are allowed; missing columns are simply absent from the [`Row`].
///
/// # Arguments
/// * `reader` - Source of the delimited text
/// * `options` - Delimiter and header handling
/// * `callback` - Called once per data row
///
/// # Returns
/// Number of data rows read
pub fn read_csv_rows<R, F>(reader: R, options: &CsvOptions, mut callback: F) -> Result<usize>
where
    R: Read,
    F: FnMut(Row) -> Result<()>,
{
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quoting(options.quoting)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let mut header = String::from_utf8_lossy(raw).into_owned();
            if idx == 0 {
                header = header.trim_start_matches('\u{feff}').to_string();
            }
            if options.trim_headers {
                header = header.trim().to_string();
            }
            header
        })
        .collect();

    let mut count = 0;
    for record in csv_reader.byte_records() {
        let record = record?;
        let row = Row::from_pairs(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), String::from_utf8_lossy(v).into_owned())),
        );
        callback(row)?;
        count += 1;
    }
    Ok(count)
}
