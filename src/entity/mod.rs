//! Entities: typed bags of property values with an id.

pub mod ids;
pub mod store;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::schema::Schema;
use crate::schema::types::iso_date;

pub use store::EntityStore;

/// Values that can be added to an entity property
pub trait PropValues {
    /// Raw string values, before cleaning
    fn into_values(self) -> Vec<String>;
}

impl PropValues for &str {
    fn into_values(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl PropValues for String {
    fn into_values(self) -> Vec<String> {
        vec![self]
    }
}

impl PropValues for &String {
    fn into_values(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl PropValues for Vec<String> {
    fn into_values(self) -> Vec<String> {
        self
    }
}

impl PropValues for &[String] {
    fn into_values(self) -> Vec<String> {
        self.to_vec()
    }
}

impl PropValues for &Vec<String> {
    fn into_values(self) -> Vec<String> {
        self.clone()
    }
}

impl PropValues for NaiveDate {
    fn into_values(self) -> Vec<String> {
        vec![iso_date(self)]
    }
}

/// Adding an entity stores a reference to its id
impl PropValues for &Entity {
    fn into_values(self) -> Vec<String> {
        self.id.clone().into_iter().collect()
    }
}

impl<T: PropValues> PropValues for Option<T> {
    fn into_values(self) -> Vec<String> {
        self.map(PropValues::into_values).unwrap_or_default()
    }
}

/// A typed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Option<String>,
    pub schema: Schema,
    #[serde(default)]
    pub properties: BTreeMap<String, Vec<String>>,
}

impl Entity {
    /// Create an empty entity without an id
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            id: None,
            schema,
            properties: BTreeMap::new(),
        }
    }

    /// Create an empty entity with an id
    #[must_use]
    pub fn with_id(schema: Schema, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            schema,
            properties: BTreeMap::new(),
        }
    }

    /// Whether the entity's schema is `schema` or inherits from it
    #[must_use]
    pub fn is_a(&self, schema: Schema) -> bool {
        self.schema.is_a(schema)
    }

    /// Add values to a property.
    ///
    /// Each value is cleaned according to the property type; values that do
    /// not clean (empty strings, unparseable dates, unknown countries) are
    /// dropped. Fails if the property does not exist on the schema.
    pub fn add<V: PropValues>(&mut self, prop: &str, values: V) -> Result<()> {
        let Some(property) = self.schema.property(prop) else {
            return Err(IngestError::InvalidProperty {
                schema: self.schema.name().to_string(),
                property: prop.to_string(),
            });
        };
        for raw in values.into_values() {
            match property.kind.clean(&raw) {
                Some(value) => self.push_value(property.name, value),
                None => {
                    if !raw.trim().is_empty() {
                        log::debug!(
                            "[{}] dropped invalid {} value for {}: {:?}",
                            self.schema,
                            property.kind,
                            property.name,
                            raw
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Add values, silently ignoring properties the schema does not have
    pub fn add_quiet<V: PropValues>(&mut self, prop: &str, values: V) {
        if self.schema.property(prop).is_some() {
            // Property exists, so `add` cannot fail
            let _ = self.add(prop, values);
        }
    }

    fn push_value(&mut self, prop: &'static str, value: String) {
        let values = self.properties.entry(prop.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// All values of a property
    #[must_use]
    pub fn get(&self, prop: &str) -> &[String] {
        self.properties.get(prop).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First value of a property
    #[must_use]
    pub fn first(&self, prop: &str) -> Option<&str> {
        self.get(prop).first().map(String::as_str)
    }

    /// Whether a property has any value
    #[must_use]
    pub fn has(&self, prop: &str) -> bool {
        !self.get(prop).is_empty()
    }

    /// Remove all values of a property
    pub fn remove(&mut self, prop: &str) -> Vec<String> {
        self.properties.remove(prop).unwrap_or_default()
    }

    /// Display label for the entity
    #[must_use]
    pub fn caption(&self) -> Option<String> {
        if let Some(name) = self.first("name") {
            return Some(name.to_string());
        }
        if let Some(full) = self.first("full") {
            return Some(full.to_string());
        }
        let parts: Vec<&str> = ["firstName", "lastName"]
            .iter()
            .filter_map(|p| self.first(p))
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        self.id.clone()
    }

    /// Merge another entity with the same id into this one.
    ///
    /// The schema becomes the common schema of both, and values are unioned.
    pub fn merge(&mut self, other: &Entity) -> Result<()> {
        if let (Some(left), Some(right)) = (&self.id, &other.id) {
            if left != right {
                return Err(IngestError::InvalidEntity(format!(
                    "cannot merge entities with different ids: {left} / {right}"
                )));
            }
        }
        self.schema = self.schema.common_with(other.schema)?;
        if self.id.is_none() {
            self.id.clone_from(&other.id);
        }
        for (prop, values) in &other.properties {
            let target = self.properties.entry(prop.clone()).or_default();
            for value in values {
                if !target.contains(value) {
                    target.push(value.clone());
                }
            }
        }
        Ok(())
    }

    /// Check that the entity can be emitted
    pub fn validate(&self) -> Result<()> {
        if self.id.as_deref().is_none_or(str::is_empty) {
            return Err(IngestError::InvalidEntity(format!(
                "{} entity has no id ({:?})",
                self.schema,
                self.caption()
            )));
        }
        if self.schema.is_abstract() {
            return Err(IngestError::InvalidEntity(format!(
                "{} is abstract and cannot be emitted",
                self.schema
            )));
        }
        Ok(())
    }
}
