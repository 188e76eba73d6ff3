//! Utility functions for error handling
//!
//! Path checks that produce errors naming both the path and the reason it was needed.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Check that a file exists and can be opened
///
/// # Arguments
/// * `path` - The path to the file
/// * `purpose` - Why the file is needed (for error context)
pub fn validate_file(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(IngestError::path(
            format!("File not found (needed for: {purpose})"),
            path,
        ));
    }

    if !path.is_file() {
        return Err(IngestError::path(
            format!("Path is not a file (expected a file for: {purpose})"),
            path,
        ));
    }

    match fs::File::open(path) {
        Ok(_) => Ok(()),
        Err(e) => {
            let message = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check file permissions".to_string()
                }
                _ => format!("Failed to open file for: {purpose}"),
            };
            Err(IngestError::path(message, path))
        }
    }
}

/// Create a directory (and parents) if it does not exist yet
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| {
        IngestError::path(format!("Failed to create output directory: {e}"), path)
    })
}
