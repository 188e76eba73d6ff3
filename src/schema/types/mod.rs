//! Property value types and their cleaning rules.

pub mod countries;
pub mod date;

use std::fmt;

use itertools::Itertools;

pub use date::{DateFormatConfig, clean_date, iso_date, parse_date_string};

/// Topic tags an entity can carry
pub const TOPICS: &[&str] = &[
    "sanction",
    "sanction.linked",
    "corp.offshore",
    "corp.shell",
    "corp.public",
    "corp.disqual",
    "role.pep",
    "role.rca",
    "crime",
    "debarment",
    "export.control",
];

/// The value type of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Name,
    String,
    Text,
    Date,
    Country,
    Url,
    Identifier,
    Number,
    Email,
    Phone,
    Iban,
    Topic,
    Address,
    /// Reference to another entity by id
    Entity,
}

impl PropertyType {
    /// Lowercase type name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::String => "string",
            Self::Text => "text",
            Self::Date => "date",
            Self::Country => "country",
            Self::Url => "url",
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Iban => "iban",
            Self::Topic => "topic",
            Self::Address => "address",
            Self::Entity => "entity",
        }
    }

    /// Normalise one raw value, or reject it with `None`
    #[must_use]
    pub fn clean(self, raw: &str) -> Option<String> {
        let text = collapse_whitespace(raw)?;
        match self {
            Self::Name | Self::String | Self::Address | Self::Identifier | Self::Entity => {
                Some(text)
            }
            Self::Text => Some(raw.trim().to_string()),
            Self::Date => clean_date(&text),
            Self::Country => countries::to_code(&text).map(str::to_string),
            Self::Url => {
                let lower = text.to_lowercase();
                if lower.starts_with("http://") || lower.starts_with("https://") {
                    Some(text)
                } else {
                    None
                }
            }
            Self::Number => {
                let compact: String = text.chars().filter(|c| !matches!(c, ' ' | ',')).collect();
                compact.parse::<f64>().ok().map(|_| compact)
            }
            Self::Email => {
                if text.contains('@') && !text.contains(' ') {
                    Some(text.to_lowercase())
                } else {
                    None
                }
            }
            Self::Phone => {
                let digits = text.chars().filter(char::is_ascii_digit).count();
                (digits >= 5).then_some(text)
            }
            Self::Iban => {
                let compact: String = text
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_uppercase();
                let valid = compact.len() >= 15
                    && compact.chars().take(2).all(|c| c.is_ascii_alphabetic())
                    && compact.chars().all(|c| c.is_ascii_alphanumeric());
                valid.then_some(compact)
            }
            Self::Topic => {
                let lower = text.to_lowercase();
                TOPICS.contains(&lower.as_str()).then_some(lower)
            }
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trim a value and squeeze internal whitespace; `None` when nothing is left
#[must_use]
pub fn collapse_whitespace(text: &str) -> Option<String> {
    let joined = text.split_whitespace().join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}
