//! Running datasets end to end.
//!
//! A run resolves the dataset, opens a file-backed [`Context`] under the
//! output directory, parses the sources and writes the dataset index.
//! Several datasets run in parallel on the rayon pool; each run is
//! independent of the others.

use std::time::Instant;

use rayon::prelude::*;

use crate::config::{DatasetMetadata, IngestConfig};
use crate::context::{Context, RunSummary};
use crate::datasets::{Dataset, dataset_from_name};
use crate::error::Result;
use crate::utils::logging::log_operation_start;

/// Run one dataset and write its entities and index
///
/// # Arguments
/// * `dataset` - The importer to run
/// * `config` - Input and output locations
/// * `metadata_override` - Metadata fields replacing the importer's defaults
pub fn run_dataset(
    dataset: &dyn Dataset,
    config: &IngestConfig,
    metadata_override: Option<DatasetMetadata>,
) -> Result<RunSummary> {
    let mut metadata = dataset.metadata();
    if let Some(other) = metadata_override {
        metadata = metadata.merged_with(other);
    }
    let mut context = Context::open(metadata, config.clone())?;
    log_operation_start(context.name(), "Parsing sources in", &context.resource_dir());
    dataset.parse(&mut context)?;
    context.finish()
}

/// Run several datasets by name in parallel
///
/// Summaries come back in the order of `names`. All runs complete; the
/// first failure in that order is returned.
pub fn run_datasets(names: &[String], config: &IngestConfig) -> Result<Vec<RunSummary>> {
    let start = Instant::now();
    let datasets = names
        .iter()
        .map(|name| dataset_from_name(name))
        .collect::<Result<Vec<_>>>()?;

    let results: Vec<Result<RunSummary>> = datasets
        .par_iter()
        .map(|dataset| {
            let result = run_dataset(dataset.as_ref(), config, None);
            if let Err(err) = &result {
                log::error!("[{}] Run failed: {err}", dataset.name());
            }
            result
        })
        .collect();

    let summaries = results.into_iter().collect::<Result<Vec<_>>>()?;
    log::info!(
        "Ran {} datasets ({} entities) in {:?}",
        summaries.len(),
        summaries.iter().map(|s| s.entities).sum::<usize>(),
        start.elapsed()
    );
    Ok(summaries)
}
