//! In-memory accumulation of entities by id.
//!
//! Used by importers that see the same node several times (once per source
//! table, or again as the endpoint of a relationship) and must emit a single
//! merged entity at the end.

use rustc_hash::FxHashMap;

use super::Entity;
use crate::error::{IngestError, Result};

/// Entities keyed by id, kept in first-insertion order
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
    index: FxHashMap<String, usize>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, merging it into any stored entity with the same id.
    ///
    /// The stored entity keeps its position; its schema is widened to the
    /// common schema of both. On a schema conflict the store is unchanged.
    pub fn put(&mut self, entity: Entity) -> Result<()> {
        let Some(id) = entity.id.clone() else {
            return Err(IngestError::InvalidEntity(format!(
                "cannot store {} entity without id",
                entity.schema
            )));
        };

        match self.index.get(&id) {
            Some(&pos) => {
                let mut merged = self.entities[pos].clone();
                merged.merge(&entity)?;
                self.entities[pos] = merged;
            }
            None => {
                self.index.insert(id, self.entities.len());
                self.entities.push(entity);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&pos| &self.entities[pos])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        match self.index.get(id) {
            Some(&pos) => Some(&mut self.entities[pos]),
            None => None,
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Consume the store, yielding entities in insertion order
    #[must_use]
    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }
}
