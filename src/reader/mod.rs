//! Readers for the source formats registries publish.
//!
//! Every reader hands records to a callback rather than collecting them, so
//! dumps with millions of rows are streamed. Tabular readers produce [`Row`]s.

pub mod archive;
pub mod csv;
pub mod jsonl;
pub mod xlsx;
pub mod xml;

use rustc_hash::FxHashMap;

pub use archive::{ZipSource, for_each_tar_gz_entry};
pub use self::csv::{CsvOptions, read_csv_rows};
pub use jsonl::for_each_json_line;
pub use xlsx::read_sheet_rows;
pub use xml::XmlElement;

/// One record of a tabular source, keyed by column header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: FxHashMap<String, String>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from header/value pairs; later duplicates win
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Take a field out of the row, trimmed; `None` when missing or blank
    pub fn pop(&mut self, key: &str) -> Option<String> {
        let value = self.values.remove(key)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Take a field out of the row without any cleanup
    pub fn pop_raw(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Peek at a field, trimmed
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Fields that were never popped and still hold a value, sorted by key
    #[must_use]
    pub fn remaining(&self) -> Vec<(&str, &str)> {
        let mut left: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        left.sort_unstable();
        left
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
