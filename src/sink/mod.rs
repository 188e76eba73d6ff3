//! Output sinks for emitted entities.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::entity::Entity;
use crate::error::{IngestError, Result};

/// Receives validated entities
pub trait EntitySink: Send {
    /// Write one entity
    fn emit(&mut self, entity: &Entity) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes one JSON object per line
pub struct JsonLinesSink<W: Write + Send> {
    writer: BufWriter<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| IngestError::Io(e.into_error()))
    }
}

impl JsonLinesSink<File> {
    /// Create (or truncate) a JSON lines file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> EntitySink for JsonLinesSink<W> {
    fn emit(&mut self, entity: &Entity) -> Result<()> {
        serde_json::to_writer(&mut self.writer, entity)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects entities in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entities: Arc<Mutex<Vec<Entity>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        self.entities
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl EntitySink for MemorySink {
    fn emit(&mut self, entity: &Entity) -> Result<()> {
        let mut guard = self
            .entities
            .lock()
            .map_err(|_| IngestError::Data("memory sink lock poisoned".to_string()))?;
        guard.push(entity.clone());
        Ok(())
    }
}
