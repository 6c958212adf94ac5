//! Plain text preview of an assembled document.

use crate::error::Result;
use crate::model::Document;

/// Line separating sections in the preview.
const SECTION_RULE: &str = "----------------------------------------";

/// Convert a document to plain text.
///
/// Sections are separated by a rule line; non-breaking spaces become
/// ordinary spaces.
pub fn to_text(doc: &Document) -> Result<String> {
    let output = doc
        .sections
        .iter()
        .map(|section| section.plain_text().replace('\u{00A0}', " "))
        .collect::<Vec<_>>()
        .join(&format!("\n\n{}\n\n", SECTION_RULE));

    Ok(output.trim().to_string())
}
