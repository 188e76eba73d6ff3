//! The entity schema model.
//!
//! A small, fixed hierarchy of entity types (things, legal entities,
//! addresses, and the interests linking them) together with the properties
//! each type carries. Dataset parsers build [`crate::entity::Entity`] values
//! against these schemata.

pub mod property;
pub mod types;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
pub use property::Property;
pub use types::PropertyType;

/// An entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Schema {
    Thing,
    Interval,
    LegalEntity,
    Organization,
    Company,
    PublicBody,
    Person,
    Asset,
    Address,
    BankAccount,
    Interest,
    Ownership,
    Directorship,
    Representation,
    UnknownLink,
}

impl Schema {
    /// Every schema, parents before children
    pub const ALL: &'static [Schema] = &[
        Schema::Thing,
        Schema::Interval,
        Schema::LegalEntity,
        Schema::Organization,
        Schema::Asset,
        Schema::Company,
        Schema::PublicBody,
        Schema::Person,
        Schema::Address,
        Schema::BankAccount,
        Schema::Interest,
        Schema::Ownership,
        Schema::Directorship,
        Schema::Representation,
        Schema::UnknownLink,
    ];

    /// The schema name as used in serialized entities
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Thing => "Thing",
            Self::Interval => "Interval",
            Self::LegalEntity => "LegalEntity",
            Self::Organization => "Organization",
            Self::Company => "Company",
            Self::PublicBody => "PublicBody",
            Self::Person => "Person",
            Self::Asset => "Asset",
            Self::Address => "Address",
            Self::BankAccount => "BankAccount",
            Self::Interest => "Interest",
            Self::Ownership => "Ownership",
            Self::Directorship => "Directorship",
            Self::Representation => "Representation",
            Self::UnknownLink => "UnknownLink",
        }
    }

    /// Look up a schema by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name.trim())
    }

    /// Abstract schemata cannot be emitted
    #[must_use]
    pub fn is_abstract(self) -> bool {
        matches!(self, Self::Thing | Self::Interval | Self::Interest)
    }

    /// Whether entities of this schema link two other entities
    #[must_use]
    pub fn is_edge(self) -> bool {
        self.is_a(Self::Interest)
    }

    /// Direct parents of this schema
    #[must_use]
    pub fn extends(self) -> &'static [Schema] {
        match self {
            Self::Thing | Self::Interval => &[],
            Self::LegalEntity | Self::Asset | Self::Address => &[Self::Thing],
            Self::Organization | Self::Person => &[Self::LegalEntity],
            Self::Company => &[Self::Organization, Self::Asset],
            Self::PublicBody => &[Self::Organization],
            Self::BankAccount => &[Self::Asset],
            Self::Interest => &[Self::Interval],
            Self::Ownership | Self::Directorship | Self::Representation | Self::UnknownLink => {
                &[Self::Interest]
            }
        }
    }

    /// Whether this schema is `other` or inherits from it
    #[must_use]
    pub fn is_a(self, other: Schema) -> bool {
        self == other || self.extends().iter().any(|parent| parent.is_a(other))
    }

    /// Properties defined directly on this schema
    #[must_use]
    pub fn own_properties(self) -> &'static [Property] {
        property::own_properties(self)
    }

    /// Resolve a property defined on this schema or any of its parents
    #[must_use]
    pub fn property(self, name: &str) -> Option<&'static Property> {
        if let Some(prop) = self.own_properties().iter().find(|p| p.name == name) {
            return Some(prop);
        }
        self.extends().iter().find_map(|parent| parent.property(name))
    }

    /// All property names available on this schema
    #[must_use]
    pub fn property_names(self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for schema in Self::ALL.iter().copied().filter(|s| self.is_a(*s)) {
            names.extend(schema.own_properties().iter().map(|p| p.name));
        }
        names.sort_unstable();
        names.dedup();
        names
    }

    /// The schema that can hold entities of both `self` and `other`.
    ///
    /// If one schema already inherits from the other, the more specific one is
    /// returned. Otherwise the most general concrete schema that inherits from
    /// both is used, e.g. `Organization` and `Asset` become `Company`.
    pub fn common_with(self, other: Schema) -> Result<Schema> {
        if self.is_a(other) {
            return Ok(self);
        }
        if other.is_a(self) {
            return Ok(other);
        }

        let candidates: Vec<Schema> = Self::ALL
            .iter()
            .copied()
            .filter(|s| !s.is_abstract() && s.is_a(self) && s.is_a(other))
            .collect();

        let most_general: Vec<Schema> = candidates
            .iter()
            .copied()
            .filter(|c| candidates.iter().all(|d| d.is_a(*c)))
            .collect();

        match most_general.as_slice() {
            [schema] => Ok(*schema),
            _ => Err(IngestError::SchemaConflict {
                left: self.name().to_string(),
                right: other.name().to_string(),
            }),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Schema {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| IngestError::Data(format!("Unknown schema: {s}")))
    }
}
