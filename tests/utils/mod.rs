use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use regdump::context::ENTITIES_FILE;
use regdump::{Entity, IngestConfig, RunSummary, Schema, dataset_from_name, run_dataset};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A scratch workspace with `data/` and `out/` roots
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Source directory of a dataset, created on demand
    #[must_use]
    pub fn resource_dir(&self, dataset: &str) -> PathBuf {
        let dir = self.dir.path().join("data").join(dataset);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Offline configuration without spinners
    #[must_use]
    pub fn config(&self) -> IngestConfig {
        IngestConfig::new(self.dir.path().join("data"), self.output_dir()).with_progress(false)
    }

    /// Write a text file under a dataset's source directory
    pub fn write_resource(&self, dataset: &str, name: &str, content: &str) -> PathBuf {
        let path = self.resource_dir(dataset).join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Run a dataset by name against this workspace
    pub fn run(&self, dataset: &str) -> RunSummary {
        let dataset = dataset_from_name(dataset).unwrap();
        run_dataset(dataset.as_ref(), &self.config(), None).unwrap()
    }

    /// Entities written by a previous run
    #[must_use]
    pub fn entities(&self, dataset: &str) -> Vec<Entity> {
        let path = self.output_dir().join(dataset).join(ENTITIES_FILE);
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

/// Write a zip archive of text members
pub fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, content) in members {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

/// Write a gzipped tarball of text members
pub fn write_tar_gz(path: &Path, members: &[(&str, &str)]) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, content) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

/// Entity with the given id; later fragments are merged into the first
#[must_use]
pub fn merged(entities: &[Entity], id: &str) -> Option<Entity> {
    let mut found: Option<Entity> = None;
    for entity in entities.iter().filter(|e| e.id.as_deref() == Some(id)) {
        match &mut found {
            Some(first) => first.merge(entity).unwrap(),
            None => found = Some(entity.clone()),
        }
    }
    found
}

/// Entities of one schema
#[must_use]
pub fn of_schema(entities: &[Entity], schema: Schema) -> Vec<&Entity> {
    entities.iter().filter(|e| e.schema == schema).collect()
}

/// Write a single-sheet `.xlsx` workbook of inline string cells.
///
/// Cells that parse as whole numbers are stored as numbers, like a
/// spreadsheet application would.
pub fn write_xlsx(path: &Path, sheet: &str, rows: &[&[&str]]) {
    let mut sheet_rows = String::new();
    for (r, cells) in rows.iter().enumerate() {
        let r = r + 1;
        sheet_rows.push_str(&format!("<row r=\"{r}\">"));
        for (c, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{r}", char::from(b'A' + c as u8));
            if value.bytes().all(|b| b.is_ascii_digit()) {
                sheet_rows.push_str(&format!("<c r=\"{cell_ref}\"><v>{value}</v></c>"));
            } else {
                let text = value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");
                sheet_rows.push_str(&format!(
                    "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{text}</t></is></c>"
                ));
            }
        }
        sheet_rows.push_str("</row>");
    }

    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;
    let root_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{sheet}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
    );
    let workbook_rels = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
    let worksheet = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_rows}</sheetData></worksheet>"#
    );
    write_zip(
        path,
        &[
            ("[Content_Types].xml", content_types),
            ("_rels/.rels", root_rels),
            ("xl/workbook.xml", workbook.as_str()),
            ("xl/_rels/workbook.xml.rels", workbook_rels),
            ("xl/worksheets/sheet1.xml", worksheet.as_str()),
        ],
    );
}

/// Answer `count` HTTP requests with `body`, one connection each.
///
/// Returns the server's base URL, e.g. `http://127.0.0.1:4567`.
pub fn serve(body: Vec<u8>, content_type: &'static str, count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming().take(count) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        }
    });
    format!("http://{addr}")
}
