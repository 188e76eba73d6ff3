//! Combined catalog of dataset indexes.
//!
//! Reads a list of index locations (one URL or local path per line), loads
//! them concurrently and writes a single catalog document listing every
//! dataset once, sorted by name.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::error::util::validate_file;
use crate::error::{IngestError, Result};

/// The catalog document
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub updated_at: String,
    pub datasets: Vec<Value>,
}

/// Index locations from the input file, skipping blanks and `#` comments
fn read_locations(input: &Path) -> Result<Vec<String>> {
    validate_file(input, "catalog input list")?;
    let text = fs::read_to_string(input)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

async fn load_index(client: &reqwest::Client, location: &str) -> Result<Value> {
    let value: Value = if is_url(location) {
        client
            .get(location)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?
    } else {
        let text = tokio::fs::read_to_string(location).await?;
        serde_json::from_str(&text)?
    };
    if !value.is_object() {
        return Err(IngestError::Catalog(format!("{location} is not a JSON object")));
    }
    Ok(value)
}

/// Load every index concurrently and combine them
///
/// Failed locations are logged and left out. When two indexes share a
/// dataset name, the one listed later wins.
pub async fn collect_catalog(locations: &[String]) -> Result<Catalog> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("regdump/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let futures = locations.iter().map(|location| load_index(&client, location));
    let results = join_all(futures).await;

    let mut datasets: BTreeMap<String, Value> = BTreeMap::new();
    for (location, result) in locations.iter().zip(results) {
        match result {
            Ok(index) => match index.get("name").and_then(Value::as_str) {
                Some(name) => {
                    datasets.insert(name.to_string(), index);
                }
                None => log::warn!("Index without dataset name: {location}"),
            },
            Err(err) => log::warn!("Cannot load index {location}: {err}"),
        }
    }

    Ok(Catalog {
        updated_at: Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        datasets: datasets.into_values().collect(),
    })
}

fn run_collect(locations: &[String]) -> Result<Catalog> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(collect_catalog(locations))
}

/// Build the catalog from an input list and write it as JSON
///
/// # Arguments
/// * `input` - Text file with one index URL or path per line
/// * `output` - Where to write the catalog
pub fn build_catalog(input: &Path, output: &Path) -> Result<Catalog> {
    let locations = read_locations(input)?;
    log::info!("Building catalog from {} indexes", locations.len());

    let catalog = if tokio::runtime::Handle::try_current().is_ok() {
        // The caller's runtime cannot be blocked on, so drive the fetch
        // from a separate thread with its own runtime
        std::thread::scope(|scope| scope.spawn(|| run_collect(&locations)).join())
            .map_err(|_| IngestError::Catalog("catalog worker panicked".to_string()))??
    } else {
        run_collect(&locations)?
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        crate::error::util::ensure_directory(parent)?;
    }
    fs::write(output, serde_json::to_string_pretty(&catalog)?)?;
    log::info!("Wrote {} datasets to {}", catalog.datasets.len(), output.display());
    Ok(catalog)
}
