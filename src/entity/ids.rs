//! Identifier and slug generation.

use itertools::Itertools;
use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Hash the non-empty parts into a stable hex id.
///
/// Returns `None` when every part is empty.
pub fn make_entity_id<I, S>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    let mut seen = false;
    for part in parts {
        let part = part.as_ref().trim();
        if part.is_empty() {
            continue;
        }
        hasher.update(part.as_bytes());
        hasher.update(b"\x1f");
        seen = true;
    }
    if !seen {
        return None;
    }
    let digest = hex::encode(hasher.finalize());
    Some(digest[..40].to_string())
}

/// ASCII, lowercase, dash-separated form of `text`; `None` if nothing remains
#[must_use]
pub fn slugify(text: &str) -> Option<String> {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() { None } else { Some(slug) }
}

/// Slugify each non-empty part and join them with dashes
pub fn join_slug<I, S>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .filter_map(|p| slugify(p.as_ref()))
        .join("-");
    if joined.is_empty() { None } else { Some(joined) }
}
