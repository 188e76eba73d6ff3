//! The per-dataset run context.
//!
//! A [`Context`] is handed to a dataset parser. It creates entities and ids
//! under the dataset's prefix, validates and forwards emitted entities to the
//! sink, locates (and optionally downloads) source files, and writes the
//! dataset index when the run finishes.

pub mod fetch;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;

use crate::config::{DatasetMetadata, IngestConfig};
use crate::entity::Entity;
use crate::entity::ids::{join_slug, make_entity_id};
use crate::error::util::ensure_directory;
use crate::error::{IngestError, Result};
use crate::schema::Schema;
use crate::sink::{EntitySink, JsonLinesSink};
use crate::utils::logging::{RowProgress, log_operation_complete, log_operation_start};

/// File name of the entity stream inside a dataset's output directory
pub const ENTITIES_FILE: &str = "entities.ftm.json";
/// File name of the dataset index inside a dataset's output directory
pub const INDEX_FILE: &str = "index.json";

/// Outcome of one dataset run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub dataset: String,
    pub entities: usize,
    pub schemata: BTreeMap<Schema, usize>,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// The published description of a dataset run
#[derive(Debug, Clone, Serialize)]
pub struct DatasetIndex<'a> {
    #[serde(flatten)]
    pub metadata: &'a DatasetMetadata,
    pub updated_at: String,
    pub entity_count: usize,
    pub schemata: BTreeMap<String, usize>,
}

/// Emission API and resource access for one dataset
pub struct Context {
    metadata: DatasetMetadata,
    config: IngestConfig,
    prefix: String,
    sink: Box<dyn EntitySink>,
    output_dir: Option<PathBuf>,
    schemata: BTreeMap<Schema, usize>,
    emitted: usize,
    started: Instant,
}

impl Context {
    /// Create a context writing to an arbitrary sink
    #[must_use]
    pub fn new(metadata: DatasetMetadata, config: IngestConfig, sink: Box<dyn EntitySink>) -> Self {
        let prefix = metadata.prefix();
        Self {
            metadata,
            config,
            prefix,
            sink,
            output_dir: None,
            schemata: BTreeMap::new(),
            emitted: 0,
            started: Instant::now(),
        }
    }

    /// Create a context writing JSON lines to `<output_dir>/<name>/entities.ftm.json`.
    ///
    /// The dataset index is written next to it when the run finishes.
    pub fn open(metadata: DatasetMetadata, config: IngestConfig) -> Result<Self> {
        let output_dir = config.output_dir.join(&metadata.name);
        ensure_directory(&output_dir)?;
        let path = output_dir.join(ENTITIES_FILE);
        log_operation_start(&metadata.name, "Writing entities to", &path);
        let sink = JsonLinesSink::create(&path)?;
        let mut context = Self::new(metadata, config, Box::new(sink));
        context.output_dir = Some(output_dir);
        Ok(context)
    }

    #[must_use]
    pub fn dataset(&self) -> &DatasetMetadata {
        &self.metadata
    }

    /// Dataset name, for log prefixes
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// An empty entity of `schema`
    #[must_use]
    pub fn make(&self, schema: Schema) -> Entity {
        Entity::new(schema)
    }

    /// Hashed id under the dataset prefix; `None` when all parts are empty
    pub fn make_id<I, S>(&self, parts: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        make_entity_id(parts).map(|hash| format!("{}-{hash}", self.prefix))
    }

    /// Readable slug id under the dataset prefix; `None` when all parts are empty
    pub fn make_slug<I, S>(&self, parts: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        join_slug(parts).map(|slug| format!("{}-{slug}", self.prefix))
    }

    /// Validate an entity and write it to the sink
    pub fn emit(&mut self, entity: &Entity) -> Result<()> {
        entity.validate()?;
        self.sink.emit(entity)?;
        *self.schemata.entry(entity.schema).or_default() += 1;
        self.emitted += 1;
        Ok(())
    }

    /// Number of entities emitted so far
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Directory holding this dataset's source files
    #[must_use]
    pub fn resource_dir(&self) -> PathBuf {
        self.config.data_dir.join(&self.metadata.name)
    }

    /// Path of a source file that must already exist
    pub fn get_resource_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.resource_dir().join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(IngestError::MissingResource(path))
        }
    }

    /// Path of a source file, downloading it from `url` when missing.
    ///
    /// An existing file is always reused. Downloads only happen when the
    /// configuration allows fetching.
    pub fn fetch_resource(&self, name: &str, url: &str) -> Result<PathBuf> {
        let path = self.resource_dir().join(name);
        if path.is_file() {
            log::debug!("[{}] Using cached resource {}", self.name(), path.display());
            return Ok(path);
        }
        if !self.config.fetch {
            return Err(IngestError::MissingResource(path));
        }
        ensure_directory(&self.resource_dir())?;
        log_operation_start(self.name(), &format!("Fetching {url} to"), &path);
        fetch::download(url, &path)?;
        Ok(path)
    }

    /// Fetch a page as text without caching it
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        if !self.config.fetch {
            return Err(IngestError::Data(format!("fetching disabled, cannot load {url}")));
        }
        fetch::get_text(url)
    }

    /// Row counter using the configured log interval
    #[must_use]
    pub fn progress(&self, label: &str) -> RowProgress {
        RowProgress::new(
            &format!("{}/{label}", self.metadata.name),
            self.config.log_interval,
            self.config.progress,
        )
    }

    /// The index document describing this run so far
    #[must_use]
    pub fn index(&self) -> DatasetIndex<'_> {
        DatasetIndex {
            metadata: &self.metadata,
            updated_at: Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            entity_count: self.emitted,
            schemata: self
                .schemata
                .iter()
                .map(|(schema, count)| (schema.name().to_string(), *count))
                .collect(),
        }
    }

    /// Write the dataset index as JSON
    pub fn export_metadata(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.index())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Flush the sink, write the index for file-backed runs, and summarise
    pub fn finish(mut self) -> Result<RunSummary> {
        self.sink.flush()?;
        if let Some(dir) = &self.output_dir {
            self.export_metadata(&dir.join(INDEX_FILE))?;
        }
        let elapsed = self.started.elapsed();
        log_operation_complete(
            &self.metadata.name,
            "Emitted",
            self.output_dir.as_deref().unwrap_or_else(|| Path::new("memory")),
            self.emitted,
            Some(elapsed),
        );
        Ok(RunSummary {
            dataset: self.metadata.name,
            entities: self.emitted,
            schemata: self.schemata,
            elapsed,
        })
    }
}
