//! Base document: style-bearing parts cloned from an existing DOCX.

use super::package::{
    CT_FONT_TABLE, CT_NUMBERING, CT_STYLES, CT_THEME, REL_FONT_TABLE, REL_NUMBERING, REL_STYLES,
    REL_THEME,
};
use crate::detect::{detect_format_from_bytes, ContainerFormat};
use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// A part carried over from the base document.
#[derive(Debug, Clone)]
pub struct TemplatePart {
    /// Package path (e.g. `word/styles.xml`)
    pub name: String,
    /// Target relative to `word/`
    pub target: &'static str,
    /// Relationship type from the main document
    pub rel_type: &'static str,
    /// Content type override
    pub content_type: &'static str,
    /// Raw part data
    pub data: Vec<u8>,
}

struct CarriedPart {
    name: &'static str,
    target: &'static str,
    rel_type: &'static str,
    content_type: &'static str,
    required: bool,
    /// Parts with their own relationships cannot be carried standalone.
    rels: &'static str,
}

const CARRIED_PARTS: &[CarriedPart] = &[
    CarriedPart {
        name: "word/styles.xml",
        target: "styles.xml",
        rel_type: REL_STYLES,
        content_type: CT_STYLES,
        required: true,
        rels: "word/_rels/styles.xml.rels",
    },
    CarriedPart {
        name: "word/fontTable.xml",
        target: "fontTable.xml",
        rel_type: REL_FONT_TABLE,
        content_type: CT_FONT_TABLE,
        required: false,
        rels: "word/_rels/fontTable.xml.rels",
    },
    CarriedPart {
        name: "word/theme/theme1.xml",
        target: "theme/theme1.xml",
        rel_type: REL_THEME,
        content_type: CT_THEME,
        required: false,
        rels: "word/theme/_rels/theme1.xml.rels",
    },
    CarriedPart {
        name: "word/numbering.xml",
        target: "numbering.xml",
        rel_type: REL_NUMBERING,
        content_type: CT_NUMBERING,
        required: false,
        rels: "word/_rels/numbering.xml.rels",
    },
];

/// Styles, fonts, theme and numbering cloned from a template DOCX.
///
/// Body content of the template is not carried over.
#[derive(Debug, Clone)]
pub struct BaseDocument {
    source: Option<PathBuf>,
    parts: Vec<TemplatePart>,
}

impl BaseDocument {
    /// Open a template DOCX.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut base = Self::from_bytes(&data).map_err(|e| match e {
            Error::Template(msg) => Error::Template(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        base.source = Some(path.to_path_buf());
        log::info!(
            "Using base template {} ({} parts)",
            path.display(),
            base.parts.len()
        );
        Ok(base)
    }

    /// Read a template DOCX from memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format_from_bytes(data) {
            Ok(ContainerFormat::Zip) => {}
            _ => return Err(Error::Template("not a DOCX (ZIP) file".into())),
        }

        let mut archive = ZipArchive::new(Cursor::new(data))?;
        if archive.by_name("word/document.xml").is_err() {
            return Err(Error::Template("missing word/document.xml".into()));
        }

        let mut parts = Vec::new();
        for carried in CARRIED_PARTS {
            if !carried.required && archive.by_name(carried.rels).is_ok() {
                log::warn!("Skipping {}: it references other parts", carried.name);
                continue;
            }
            let data = match archive.by_name(carried.name) {
                Ok(mut file) => {
                    let mut data = Vec::with_capacity(file.size() as usize);
                    file.read_to_end(&mut data)?;
                    data
                }
                Err(ZipError::FileNotFound) if carried.required => {
                    return Err(Error::Template(format!("missing {}", carried.name)));
                }
                Err(ZipError::FileNotFound) => continue,
                Err(e) => return Err(e.into()),
            };
            parts.push(TemplatePart {
                name: carried.name.to_string(),
                target: carried.target,
                rel_type: carried.rel_type,
                content_type: carried.content_type,
                data,
            });
        }

        Ok(Self {
            source: None,
            parts,
        })
    }

    /// Path the template was read from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Carried parts.
    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Check if a part was carried over.
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }
}
