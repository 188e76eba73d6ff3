//! Date parsing and cleaning.
//!
//! Entity dates are ISO-8601 prefixes: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
//! Source dumps use a mix of local formats which are parsed here.

use chrono::NaiveDate;

/// Configuration for date format handling
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%d.%m.%Y".to_string(), // Baltic/Czech: 15.01.2023
                "%d-%b-%Y".to_string(), // 15-JAN-2023
                "%b %d, %Y".to_string(), // Jan 15, 2023
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            enable_format_detection: true,
        }
    }
}

impl DateFormatConfig {
    /// Build a configuration trying exactly the given formats, in order
    #[must_use]
    pub fn with_formats(formats: &[&str]) -> Self {
        Self {
            date_formats: formats.iter().map(|f| (*f).to_string()).collect(),
            enable_format_detection: false,
        }
    }
}

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Try all the provided formats
    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    // If enabled, try to detect the format based on string patterns
    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // ISO-like format with dashes (YYYY-MM-DD)
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                // Registers in scope are European: prefer DD/MM/YYYY
                return Some("%d/%m/%Y");
            } else if parts[2].len() == 2 {
                return Some("%d/%m/%y");
            }
        }
    }

    // Dots (DD.MM.YYYY)
    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    // Compact format (YYYYMMDD)
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}

/// Format a date as an ISO string
#[must_use]
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Clean a date property value into an ISO prefix.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and datetimes (truncated to the
/// day). Anything else is given to [`parse_date_string`] with the default
/// configuration.
#[must_use]
pub fn clean_date(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let head = text.get(..10).unwrap_or(text);
    let parts: Vec<&str> = head.split('-').collect();
    match parts.as_slice() {
        [year] if is_digits(year, 4) => return Some((*year).to_string()),
        [year, month] if is_digits(year, 4) && is_digits(month, 2) => {
            let m: u32 = month.parse().ok()?;
            if (1..=12).contains(&m) {
                return Some(format!("{year}-{month}"));
            }
            return None;
        }
        [_, _, _] => {
            if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return Some(iso_date(date));
            }
        }
        _ => {}
    }

    parse_date_string(text, &DateFormatConfig::default()).map(iso_date)
}
