//! Document-level types.

use super::{PageGeometry, Resource, Section, SectionStart};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An assembled output document.
///
/// A new document always has one initial section; the first record is
/// rendered into it and every later record opens a new section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, author, etc.)
    pub metadata: Metadata,

    /// Base font applied to runs that do not set their own
    pub defaults: DocumentDefaults,

    /// Sections in order
    pub sections: Vec<Section>,

    /// Embedded resources (figures) keyed by resource ID
    pub resources: BTreeMap<String, Resource>,
}

impl Document {
    /// Create a new document with one empty initial section.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            defaults: DocumentDefaults::default(),
            sections: vec![Section::default()],
            resources: BTreeMap::new(),
        }
    }

    /// Get the number of sections in the document.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// The initial section.
    pub fn first_section_mut(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::default());
        }
        &mut self.sections[0]
    }

    /// The section records are currently rendered into (the last one).
    pub fn current_section_mut(&mut self) -> &mut Section {
        if self.sections.is_empty() {
            self.sections.push(Section::default());
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Append a new section and return it.
    pub fn add_section(&mut self, geometry: PageGeometry, start: SectionStart) -> &mut Section {
        self.sections.push(Section::new(geometry, start));
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Add a resource and return its generated ID (`image1`, `image2`, ...).
    pub fn add_resource(&mut self, resource: Resource) -> String {
        let id = format!("image{}", self.resources.len() + 1);
        self.resources.insert(id.clone(), resource);
        id
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Check if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.paragraphs.is_empty())
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| section.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Document-wide run defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentDefaults {
    /// Base font family
    pub font_name: Option<String>,

    /// Base font size in points
    pub font_size: Option<f32>,
}

impl DocumentDefaults {
    /// Check if any default is set.
    pub fn is_set(&self) -> bool {
        self.font_name.is_some() || self.font_size.is_some()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Template layout used to render the records
    pub template: Option<String>,

    /// Number of records rendered
    pub record_count: u32,
}

impl Metadata {
    /// Create metadata stamped with the current time.
    pub fn now() -> Self {
        Self {
            created: Some(Utc::now()),
            ..Default::default()
        }
    }
}
