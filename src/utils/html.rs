//! Link discovery on download pages.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{IngestError, Result};

fn href_pattern() -> Result<&'static Regex> {
    static HREF: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = HREF.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#)
        .map_err(|e| IngestError::Data(format!("invalid link pattern: {e}")))?;
    Ok(HREF.get_or_init(|| pattern))
}

/// All link targets on a page, resolved against `base`
pub fn find_links(html: &str, base: &str) -> Result<Vec<String>> {
    let base = Url::parse(base)?;
    let mut links = Vec::new();
    for caps in href_pattern()?.captures_iter(html) {
        if let Some(href) = caps.get(1) {
            if let Ok(url) = base.join(href.as_str()) {
                links.push(url.to_string());
            }
        }
    }
    Ok(links)
}

/// First link on a page whose target contains `needle`
pub fn find_link(html: &str, base: &str, needle: &str) -> Result<Option<String>> {
    Ok(find_links(html, base)?
        .into_iter()
        .find(|link| link.contains(needle)))
}
