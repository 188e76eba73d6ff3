//! Configuration for dataset runs and dataset metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::error::util::validate_file;

/// Default number of rows between progress log lines
pub const DEFAULT_LOG_INTERVAL: usize = 10_000;

/// Configuration for an ingestion run
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Root directory holding one sub-directory of source files per dataset
    pub data_dir: PathBuf,
    /// Root directory receiving one sub-directory of output per dataset
    pub output_dir: PathBuf,
    /// Whether missing resources may be downloaded
    pub fetch: bool,
    /// Whether to draw progress spinners on the terminal
    pub progress: bool,
    /// Rows between progress log lines
    pub log_interval: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("export"),
            fetch: false,
            progress: true,
            log_interval: DEFAULT_LOG_INTERVAL,
        }
    }
}

impl IngestConfig {
    /// Create a configuration with explicit input and output roots
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Allow downloading of missing resources
    #[must_use]
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Enable or disable terminal progress spinners
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// The organisation publishing a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Descriptive metadata of a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Machine name, e.g. `gb_coh_psc`
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Prefix for generated entity ids; defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Landing page of the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Direct download location of the bulk data, if stable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
}

impl DatasetMetadata {
    /// Create metadata with a name and title
    #[must_use]
    pub fn new(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn with_data_url(mut self, url: &str) -> Self {
        self.data_url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    #[must_use]
    pub fn with_publisher(mut self, name: &str, url: Option<&str>, country: Option<&str>) -> Self {
        self.publisher = Some(Publisher {
            name: name.to_string(),
            url: url.map(str::to_string),
            country: country.map(str::to_string),
        });
        self
    }

    /// Id prefix for entities generated in this dataset
    #[must_use]
    pub fn prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => self.name.replace('_', "-"),
        }
    }

    /// Parse metadata from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load metadata from a YAML file
    pub fn from_path(path: &Path) -> Result<Self> {
        validate_file(path, "dataset metadata")?;
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Overlay the fields set in `other` onto this metadata
    #[must_use]
    pub fn merged_with(mut self, other: Self) -> Self {
        if !other.name.is_empty() {
            self.name = other.name;
        }
        if !other.title.is_empty() {
            self.title = other.title;
        }
        self.prefix = other.prefix.or(self.prefix);
        self.summary = other.summary.or(self.summary);
        self.url = other.url.or(self.url);
        self.data_url = other.data_url.or(self.data_url);
        self.publisher = other.publisher.or(self.publisher);
        self
    }
}
