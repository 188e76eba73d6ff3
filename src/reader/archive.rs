//! Zip and gzipped tar archives.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use super::Row;
use super::csv::{CsvOptions, read_csv_rows};
use crate::error::{IngestError, Result};
use crate::error::util::validate_file;

/// An opened zip file whose members are streamed on demand
pub struct ZipSource {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl ZipSource {
    /// Open a zip archive
    pub fn open(path: &Path) -> Result<Self> {
        validate_file(path, "zip archive")?;
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Member names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .filter(|n| !n.ends_with('/'))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    /// First member whose file name (ignoring directories) ends with `suffix`
    #[must_use]
    pub fn find(&self, suffix: &str) -> Option<String> {
        self.names().into_iter().find(|name| {
            let base = name.rsplit('/').next().unwrap_or(name);
            base.ends_with(suffix)
        })
    }

    /// Stream the rows of a delimited member
    pub fn for_each_csv_row<F>(&mut self, member: &str, options: &CsvOptions, callback: F) -> Result<usize>
    where
        F: FnMut(Row) -> Result<()>,
    {
        log::info!("Reading {} from {}", member, self.path.display());
        let entry = self.archive.by_name(member)?;
        read_csv_rows(entry, options, callback)
    }

    /// Stream the lines of a text member, decoding invalid UTF-8 lossily
    pub fn for_each_line<F>(&mut self, member: &str, mut callback: F) -> Result<usize>
    where
        F: FnMut(&str) -> Result<()>,
    {
        log::info!("Reading {} from {}", member, self.path.display());
        let entry = self.archive.by_name(member)?;
        let mut reader = BufReader::new(entry);
        let mut buf = Vec::new();
        let mut count = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);
            callback(line)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Stream every regular file in a `.tar.gz` archive.
///
/// # Arguments
/// * `path` - The archive on disk
/// * `callback` - Called with the member name and a reader over its content
///
/// # Returns
/// Number of files visited
pub fn for_each_tar_gz_entry<F>(path: &Path, mut callback: F) -> Result<usize>
where
    F: FnMut(&str, &mut dyn Read) -> Result<()>,
{
    validate_file(path, "tar.gz archive")?;
    let file = File::open(path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    let mut count = 0;
    for entry in archive
        .entries()
        .map_err(|e| IngestError::path(format!("Cannot read tar archive ({e})"), path))?
    {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path()?.to_string_lossy().into_owned();
        callback(&name, &mut entry)?;
        count += 1;
    }
    Ok(count)
}
