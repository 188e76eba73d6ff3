//! Logging utilities
//!
//! Uniform log lines for dataset operations, prefixed with the dataset name.

use std::path::Path;
use std::time::Duration;

/// Log the start of reading or writing a dataset file
///
/// # Arguments
/// * `dataset` - Name of the dataset being processed
/// * `operation` - Description of the operation
/// * `path` - Path of the file or directory being operated on
pub fn log_operation_start(dataset: &str, operation: &str, path: &Path) {
    log::info!("[{dataset}] {operation} {}", path.display());
}

/// Log the end of an operation with the number of records handled
///
/// # Arguments
/// * `dataset` - Name of the dataset being processed
/// * `operation` - Past-tense description of the operation
/// * `path` - Path of the file or directory that was operated on
/// * `items` - Number of records processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    dataset: &str,
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "[{dataset}] {operation} {items} records from {} in {duration:?}",
            path.display()
        ),
        None => log::info!("[{dataset}] {operation} {items} records from {}", path.display()),
    }
}

/// Log a dataset warning, optionally naming the file it concerns
///
/// # Arguments
/// * `dataset` - Name of the dataset being processed
/// * `message` - Warning message
/// * `path` - Optional path related to the warning
pub fn log_warning(dataset: &str, message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("[{dataset}] {message}: {}", path.display());
    } else {
        log::warn!("[{dataset}] {message}");
    }
}
