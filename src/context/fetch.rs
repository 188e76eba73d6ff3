//! Blocking HTTP downloads of dataset resources.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

const USER_AGENT: &str = concat!("regdump/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(600);

fn client() -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()?)
}

/// Download `url` to `path`.
///
/// The body is written to a sibling `.part` file first and renamed once
/// complete, so an interrupted download never looks like a cached resource.
pub fn download(url: &str, path: &Path) -> Result<u64> {
    let mut response = client()?.get(url).send()?.error_for_status()?;
    let partial = path.with_extension("part");
    let written = {
        let mut writer = BufWriter::new(File::create(&partial)?);
        let written = response.copy_to(&mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        written
    };
    fs::rename(&partial, path)?;
    log::info!("Downloaded {written} bytes to {}", path.display());
    Ok(written)
}

/// GET `url` and return the body as text
pub fn get_text(url: &str) -> Result<String> {
    Ok(client()?.get(url).send()?.error_for_status()?.text()?)
}
