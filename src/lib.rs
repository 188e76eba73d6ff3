//! Ingestion of public company registers and leaks archives into a
//! normalized entity graph.
//!
//! Each dataset importer reads one publisher's bulk export and emits typed
//! entities (companies, people, addresses and the ownership, directorship
//! and representation links between them) as JSON lines.

pub mod address;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod context;
pub mod datasets;
pub mod entity;
pub mod error;
pub mod lookup;
pub mod reader;
pub mod runner;
pub mod schema;
pub mod sink;
pub mod utils;

// Core types
pub use config::{DatasetMetadata, IngestConfig};
pub use context::{Context, RunSummary};
pub use entity::{Entity, EntityStore};
pub use error::{IngestError, Result};
pub use schema::Schema;

// Datasets and running
pub use catalog::build_catalog;
pub use datasets::{DATASET_NAMES, Dataset, dataset_from_name};
pub use runner::{run_dataset, run_datasets};
pub use sink::{EntitySink, JsonLinesSink, MemorySink};
