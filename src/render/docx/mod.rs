//! DOCX output.
//!
//! The package is built in memory and written to disk in a single call,
//! so a failed render never leaves a partial file behind.

mod base;
mod package;
mod xml;

pub use base::{BaseDocument, TemplatePart};

use crate::error::Result;
use crate::model::Document;
use package::{
    app_properties_xml, core_properties_xml, register_fixed_parts, root_relationships,
    ContentTypes, PackageWriter, Relationships, CT_STYLES, REL_IMAGE, REL_STYLES,
};
use std::collections::BTreeMap;
use std::path::Path;
use xml::{default_styles_xml, DocumentXml};

/// Serialize a document to DOCX bytes.
///
/// When `base` is given its style parts replace the generated style sheet.
pub fn to_docx_bytes(doc: &Document, base: Option<&BaseDocument>) -> Result<Vec<u8>> {
    let mut types = ContentTypes::new();
    register_fixed_parts(&mut types);
    let mut rels = Relationships::new();
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();

    match base {
        Some(base) => {
            for part in base.parts() {
                rels.add(part.rel_type, part.target);
                types.add_override(&part.name, part.content_type);
                parts.push((part.name.clone(), part.data.clone()));
            }
        }
        None => {
            rels.add(REL_STYLES, "styles.xml");
            types.add_override("word/styles.xml", CT_STYLES);
            parts.push(("word/styles.xml".to_string(), default_styles_xml(&doc.defaults)?));
        }
    }

    let mut image_rels = BTreeMap::new();
    for (id, resource) in &doc.resources {
        let file_name = resource.part_name(id);
        let rel_id = rels.add(REL_IMAGE, format!("media/{}", file_name));
        types.add_default(resource.extension(), &resource.mime_type);
        image_rels.insert(id.clone(), rel_id);
        parts.push((format!("word/media/{}", file_name), resource.data.clone()));
    }

    let document_xml = DocumentXml::new(doc, &image_rels).write()?;

    let mut package = PackageWriter::new();
    package.add_part("[Content_Types].xml", &types.to_xml()?)?;
    package.add_part("_rels/.rels", &root_relationships().to_xml()?)?;
    package.add_part("docProps/core.xml", &core_properties_xml(&doc.metadata)?)?;
    package.add_part("docProps/app.xml", &app_properties_xml()?)?;
    package.add_part("word/document.xml", &document_xml)?;
    package.add_part("word/_rels/document.xml.rels", &rels.to_xml()?)?;
    for (name, data) in &parts {
        package.add_part(name, data)?;
    }

    log::debug!(
        "Packaged {} parts ({} sections, {} images)",
        package.part_count(),
        doc.section_count(),
        doc.resources.len()
    );
    package.finish()
}

/// Write a document to a DOCX file. Returns the number of bytes written.
pub fn write_docx<P: AsRef<Path>>(
    doc: &Document,
    base: Option<&BaseDocument>,
    path: P,
) -> Result<usize> {
    let bytes = to_docx_bytes(doc, base)?;
    std::fs::write(path.as_ref(), &bytes)?;
    log::info!("Wrote {} ({} bytes)", path.as_ref().display(), bytes.len());
    Ok(bytes.len())
}
