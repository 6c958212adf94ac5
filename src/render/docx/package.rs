//! OPC packaging: relationships, content types, document properties and
//! the ZIP container.

use super::xml::XmlWriter;
use crate::error::Result;
use crate::model::Metadata;
use chrono::SecondsFormat;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_CORE: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
pub(crate) const REL_FONT_TABLE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/fontTable";
pub(crate) const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_NUMBERING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

pub(crate) const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
pub(crate) const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
pub(crate) const CT_FONT_TABLE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.fontTable+xml";
pub(crate) const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub(crate) const CT_NUMBERING: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_EXTENDED: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Application name recorded in `docProps/app.xml`.
const APPLICATION: &str = "abstractdoc";

/// One entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

/// Relationship list with sequential `rIdN` identifiers.
#[derive(Debug, Default)]
pub(crate) struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its ID.
    pub(crate) fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target: target.into(),
        });
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
        for rel in &self.entries {
            w.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type),
                    ("Target", rel.target.as_str()),
                ],
            )?;
        }
        w.end("Relationships")?;
        Ok(w.into_bytes())
    }
}

/// `[Content_Types].xml` builder.
#[derive(Debug)]
pub(crate) struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    pub(crate) fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), CT_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), "application/xml".to_string());
        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    /// Register a content type for a file extension.
    pub(crate) fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .entry(extension.to_lowercase())
            .or_insert_with(|| content_type.to_string());
    }

    /// Register a content type for one part (`part` without leading slash).
    pub(crate) fn add_override(&mut self, part: &str, content_type: &str) {
        self.overrides
            .insert(format!("/{}", part), content_type.to_string());
    }

    pub(crate) fn to_xml(&self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (extension, content_type) in &self.defaults {
            w.empty(
                "Default",
                &[
                    ("Extension", extension.as_str()),
                    ("ContentType", content_type.as_str()),
                ],
            )?;
        }
        for (part, content_type) in &self.overrides {
            w.empty(
                "Override",
                &[
                    ("PartName", part.as_str()),
                    ("ContentType", content_type.as_str()),
                ],
            )?;
        }
        w.end("Types")?;
        Ok(w.into_bytes())
    }
}

/// Package-level relationships and property parts.
pub(crate) fn root_relationships() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(REL_OFFICE_DOCUMENT, "word/document.xml");
    rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
    rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
    rels
}

/// Register the fixed parts every package carries.
pub(crate) fn register_fixed_parts(types: &mut ContentTypes) {
    types.add_override("word/document.xml", CT_DOCUMENT);
    types.add_override("docProps/core.xml", CT_CORE);
    types.add_override("docProps/app.xml", CT_EXTENDED);
}

/// `docProps/core.xml`.
pub(crate) fn core_properties_xml(metadata: &Metadata) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CORE),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    if let Some(title) = &metadata.title {
        w.element("dc:title", &[], title)?;
    }
    if let Some(subject) = &metadata.subject {
        w.element("dc:subject", &[], subject)?;
    }
    if let Some(author) = &metadata.author {
        w.element("dc:creator", &[], author)?;
    }
    if let Some(keywords) = &metadata.keywords {
        w.element("cp:keywords", &[], keywords)?;
    }
    if let Some(created) = &metadata.created {
        let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
        w.element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
        w.element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    }
    w.end("cp:coreProperties")?;
    Ok(w.into_bytes())
}

/// `docProps/app.xml`.
pub(crate) fn app_properties_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("Properties", &[("xmlns", NS_EXTENDED)])?;
    w.element("Application", &[], APPLICATION)?;
    w.element("AppVersion", &[], crate::VERSION)?;
    w.end("Properties")?;
    Ok(w.into_bytes())
}

/// In-memory ZIP container.
pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    part_count: usize,
}

impl PackageWriter {
    pub(crate) fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            part_count: 0,
        }
    }

    /// Add a part. XML parts are deflated; media is stored as-is.
    pub(crate) fn add_part(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let method = if name.starts_with("word/media/") {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);
        self.zip.start_file(name, options)?;
        self.zip.write_all(data)?;
        self.part_count += 1;
        Ok(())
    }

    pub(crate) fn part_count(&self) -> usize {
        self.part_count
    }

    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}
