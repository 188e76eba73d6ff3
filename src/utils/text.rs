//! Small text helpers shared by dataset parsers.

use itertools::Itertools;

/// Join the non-empty parts with `sep`
pub fn join_text<I, S>(parts: I, sep: &str) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .filter_map(|p| {
            let p = p.as_ref().trim();
            (!p.is_empty()).then(|| p.to_string())
        })
        .join(sep);
    if joined.is_empty() { None } else { Some(joined) }
}

/// Treat the literal string `null` (any case) as missing
#[must_use]
pub fn clean_null(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return None;
    }
    Some(value.to_string())
}

/// Upper-case the first character and lower-case the rest
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
