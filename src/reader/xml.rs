//! A small owned XML element tree.
//!
//! Registry XML documents are small (one company per file), so they are read
//! fully into memory. Namespace prefixes are dropped from element and
//! attribute names.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IngestError, Result};

/// An element with its attributes, text and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a whole document and return its root element
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(IngestError::xml)? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| IngestError::xml("unbalanced closing tag"))?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let text = text.unescape().map_err(IngestError::xml)?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(IngestError::xml("document ended inside an element"));
        }
        root.ok_or_else(|| IngestError::xml("document has no root element"))
    }

    /// Parse a document held in a string
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::parse(text.as_bytes())
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(IngestError::xml)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(IngestError::xml)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    /// Attribute value by local name
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First element matching `path`.
    ///
    /// Paths are `/`-separated child names relative to this element; a
    /// leading `.//` searches all descendants for the first step.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// All elements matching `path`, in document order
    #[must_use]
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let (descend, rest) = match path.strip_prefix(".//") {
            Some(rest) => (true, rest),
            None => (false, path.strip_prefix("./").unwrap_or(path)),
        };
        let mut steps = rest.split('/').filter(|s| !s.is_empty());
        let Some(first) = steps.next() else {
            return Vec::new();
        };

        let mut current: Vec<&XmlElement> = Vec::new();
        if descend {
            self.collect_descendants(first, &mut current);
        } else {
            current.extend(self.children.iter().filter(|c| c.name == first));
        }
        for step in steps {
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter().filter(move |c| c.name == step))
                .collect();
        }
        current
    }

    fn collect_descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.collect_descendants(name, out);
        }
    }

    /// Trimmed text of the first element matching `path`; `None` when absent or empty
    #[must_use]
    pub fn findtext(&self, path: &str) -> Option<String> {
        let text = self.find(path)?.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
