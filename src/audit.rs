//! Warnings for source fields a parser leaves unused.
//!
//! Parsers pop the fields they understand out of each record and then audit
//! what is left, so schema drift in a registry dump shows up in the logs. Each
//! (dataset, field) pair is reported once per process.

use std::sync::{Mutex, OnceLock};

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::reader::Row;

fn reported() -> &'static Mutex<FxHashSet<(String, String)>> {
    static REPORTED: OnceLock<Mutex<FxHashSet<(String, String)>>> = OnceLock::new();
    REPORTED.get_or_init(|| Mutex::new(FxHashSet::default()))
}

/// Returns true the first time a field is seen for a dataset
fn first_report(dataset: &str, field: &str) -> bool {
    match reported().lock() {
        Ok(mut seen) => seen.insert((dataset.to_string(), field.to_string())),
        Err(_) => false,
    }
}

/// Warn about non-empty fields still present in `row`.
///
/// # Returns
/// Names of the unexpected fields, whether or not they were logged
pub fn audit_row(dataset: &str, row: &Row, ignore: &[&str]) -> Vec<String> {
    let mut unexpected = Vec::new();
    for (field, value) in row.remaining() {
        if ignore.contains(&field) {
            continue;
        }
        if first_report(dataset, field) {
            log::warn!("[{dataset}] Unexpected field {field:?}, e.g. {value:?}");
        }
        unexpected.push(field.to_string());
    }
    unexpected
}

/// Warn about non-empty members still present in a JSON object
pub fn audit_json(dataset: &str, data: &Map<String, Value>, ignore: &[&str]) -> Vec<String> {
    let mut unexpected = Vec::new();
    let mut keys: Vec<&String> = data.keys().collect();
    keys.sort();
    for field in keys {
        if ignore.contains(&field.as_str()) || is_blank(&data[field]) {
            continue;
        }
        if first_report(dataset, field) {
            log::warn!("[{dataset}] Unexpected field {field:?}, e.g. {}", data[field]);
        }
        unexpected.push(field.clone());
    }
    unexpected
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
