//! Declarative value lookups loaded from YAML.
//!
//! A lookups file maps messy source strings onto clean values or onto
//! structured results:
//!
//! ```yaml
//! lookups:
//!   relationships:
//!     options:
//!       - match: [shareholder of, beneficiary of]
//!         schema: Ownership
//!         start: owner
//!         end: asset
//!   dates:
//!     options:
//!       - contains: unknown
//!         value: null
//! ```
//!
//! Options are tried in order; the first whose `match`, `contains` or `regex`
//! accepts the value wins. Matching ignores case and runs of whitespace.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use rustc_hash::FxHashMap;
use serde_yaml::Value;

use crate::error::{IngestError, Result};
use crate::schema::types::collapse_whitespace;

/// The outcome attached to a lookup option
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    pub value: Option<String>,
    pub values: Vec<String>,
    /// Any other keys of the option
    pub fields: BTreeMap<String, Value>,
}

impl LookupResult {
    /// Output values: `values` when given, otherwise `value`
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        if self.values.is_empty() {
            self.value.clone().into_iter().collect()
        } else {
            self.values.clone()
        }
    }

    /// A scalar field rendered as text
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(scalar_to_string)
    }

    /// A boolean field; absent or non-boolean counts as false
    #[must_use]
    pub fn get_bool(&self, field: &str) -> bool {
        self.fields.get(field).and_then(Value::as_bool).unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
struct LookupOption {
    matches: Vec<String>,
    contains: Vec<String>,
    regexes: Vec<Regex>,
    result: LookupResult,
}

impl LookupOption {
    fn accepts(&self, raw: &str, normalized: &str) -> bool {
        self.matches.iter().any(|m| m == normalized)
            || self.contains.iter().any(|c| normalized.contains(c.as_str()))
            || self.regexes.iter().any(|r| r.is_match(raw))
    }
}

/// One named section of a lookups file
#[derive(Debug, Clone)]
pub struct Lookup {
    name: String,
    options: Vec<LookupOption>,
}

impl Lookup {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The result of the first option accepting `value`
    #[must_use]
    pub fn lookup(&self, value: &str) -> Option<&LookupResult> {
        let normalized = normalize(value);
        self.options
            .iter()
            .find(|option| option.accepts(value, &normalized))
            .map(|option| &option.result)
    }
}

/// All sections of a lookups file
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    sections: FxHashMap<String, Lookup>,
}

impl Lookups {
    /// Parse a lookups document
    pub fn from_yaml(text: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(text)?;
        let Some(sections) = doc.get("lookups").and_then(Value::as_mapping) else {
            return Err(IngestError::Lookup("missing top-level `lookups` mapping".to_string()));
        };

        let mut lookups = FxHashMap::default();
        for (key, section) in sections {
            let name = scalar_to_string(key)
                .ok_or_else(|| IngestError::Lookup("section name must be a string".to_string()))?;
            let options = match section.get("options") {
                Some(Value::Sequence(items)) => items
                    .iter()
                    .map(|item| parse_option(&name, item))
                    .collect::<Result<Vec<_>>>()?,
                Some(_) => {
                    return Err(IngestError::Lookup(format!("[{name}] options must be a list")));
                }
                None => Vec::new(),
            };
            lookups.insert(name.clone(), Lookup { name, options });
        }
        Ok(Self { sections: lookups })
    }

    /// A section by name
    pub fn section(&self, name: &str) -> Result<&Lookup> {
        self.sections
            .get(name)
            .ok_or_else(|| IngestError::Lookup(format!("no lookup section named {name:?}")))
    }
}

fn parse_option(section: &str, item: &Value) -> Result<LookupOption> {
    let Some(mapping) = item.as_mapping() else {
        return Err(IngestError::Lookup(format!("[{section}] option must be a mapping")));
    };

    let mut option = LookupOption {
        matches: Vec::new(),
        contains: Vec::new(),
        regexes: Vec::new(),
        result: LookupResult::default(),
    };
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            return Err(IngestError::Lookup(format!("[{section}] option keys must be strings")));
        };
        match key {
            "match" => option.matches = one_or_many(value).iter().map(|v| normalize(v)).collect(),
            "contains" => {
                option.contains = one_or_many(value).iter().map(|v| normalize(v)).collect();
            }
            "regex" => {
                for pattern in one_or_many(value) {
                    let regex = RegexBuilder::new(&pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| IngestError::Lookup(format!("[{section}] bad regex {pattern:?}: {e}")))?;
                    option.regexes.push(regex);
                }
            }
            "value" => option.result.value = scalar_to_string(value),
            "values" => option.result.values = one_or_many(value),
            _ => {
                option.result.fields.insert(key.to_string(), value.clone());
            }
        }
    }

    if option.matches.is_empty() && option.contains.is_empty() && option.regexes.is_empty() {
        return Err(IngestError::Lookup(format!(
            "[{section}] option has no match, contains or regex: {mapping:?}"
        )));
    }
    Ok(option)
}

fn normalize(text: &str) -> String {
    collapse_whitespace(text).unwrap_or_default().to_lowercase()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn one_or_many(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
        other => scalar_to_string(other).into_iter().collect(),
    }
}
