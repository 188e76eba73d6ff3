//! Error handling for registry ingestion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub mod util;

/// Specialized error type for dataset ingestion
#[derive(Debug, Error)]
pub enum IngestError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error decoding a delimited text file
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error decoding or encoding JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error decoding a YAML metadata or lookup file
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error reading an XML document
    #[error("XML error: {0}")]
    Xml(String),

    /// Error reading a zip archive
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error reading a spreadsheet
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] calamine::Error),

    /// Error downloading a resource
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error resolving a link found on a download page
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A path did not exist or had the wrong kind
    #[error("{message}: {}", .path.display())]
    Path { message: String, path: PathBuf },

    /// A dataset resource is missing and fetching is disabled
    #[error("Missing resource: {}", .0.display())]
    MissingResource(PathBuf),

    /// The requested dataset is not known
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// The property is not defined on the schema
    #[error("Property `{property}` is not defined on schema {schema}")]
    InvalidProperty { schema: String, property: String },

    /// Two schemata cannot be reconciled into one
    #[error("Cannot merge schema {left} with {right}")]
    SchemaConflict { left: String, right: String },

    /// An entity failed validation on emission
    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    /// A lookup section or entry is malformed
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A dataset index could not be loaded into the catalog
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Source data did not have the expected layout
    #[error("Data error: {0}")]
    Data(String),
}

impl IngestError {
    /// Create a path error with a message
    pub fn path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Path {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create an XML error from any displayable parser error
    pub fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;
