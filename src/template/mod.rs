//! Template layouts for rendering one record into a document section.
//!
//! Two layouts are provided. [`TemplateKind`] selects one when the
//! [`Assembler`](crate::assemble::Assembler) is built; every record is then
//! rendered through the same [`RecordTemplate`] object.
//!
//! # Example
//!
//! ```
//! use abstractdoc::template::TemplateKind;
//!
//! let kind: TemplateKind = "aini2016".parse().unwrap();
//! assert_eq!(kind, TemplateKind::Aini2016);
//! assert!(kind.build().required_columns().contains(&"Title"));
//! ```

mod full;
mod legacy;

pub use full::{columns as full_columns, CitationStyle, FullTemplate};
pub use legacy::{columns as legacy_columns, LegacyTemplate};

use crate::error::{Error, Result};
use crate::markup::{MarkupTokenizer, NameParser};
use crate::model::Document;
use crate::render::RenderOptions;
use crate::table::Record;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Available record layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Full workshop layout: title, authors, affiliations, DOI, body,
    /// figure, references, acknowledgement, funding and citation.
    #[default]
    Aini2016,
    /// Minimal layout: title, authors, affiliations, body and keywords.
    Jscpb2016,
}

impl TemplateKind {
    /// All layouts.
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Aini2016, TemplateKind::Jscpb2016];

    /// Selector name used in configuration.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Aini2016 => "aini2016",
            TemplateKind::Jscpb2016 => "jscpb2016",
        }
    }

    /// Build the layout.
    pub fn build(&self) -> Box<dyn RecordTemplate> {
        match self {
            TemplateKind::Aini2016 => Box::new(FullTemplate::new()),
            TemplateKind::Jscpb2016 => Box::new(LegacyTemplate::new()),
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "aini2016" | "full" => Ok(TemplateKind::Aini2016),
            "jscpb2016" | "legacy" => Ok(TemplateKind::Jscpb2016),
            other => Err(Error::Config(format!(
                "unknown template '{}' (expected aini2016 or jscpb2016)",
                other
            ))),
        }
    }
}

/// Shared state available to a layout while rendering records.
pub struct RenderContext<'a> {
    /// Formatting configuration
    pub options: &'a RenderOptions,
    /// Author/affiliation parser
    pub names: &'a NameParser,
}

impl<'a> RenderContext<'a> {
    /// Create a render context.
    pub fn new(options: &'a RenderOptions, names: &'a NameParser) -> Self {
        Self { options, names }
    }

    /// Tokenize cell text honouring the markup debug setting.
    pub fn markup<'t>(&self, text: &'t str) -> MarkupTokenizer<'t> {
        MarkupTokenizer::new(text).debug(self.options.debug_markup)
    }

    /// Resolve a figure filename against the image directory.
    pub fn figure_path(&self, filename: &str) -> PathBuf {
        match &self.options.image_dir {
            Some(dir) => dir.join(filename),
            None => PathBuf::from(filename),
        }
    }
}

/// A record layout.
///
/// `render` appends the record's paragraphs to the document's current
/// (last) section. The section geometry is set by the caller.
pub trait RecordTemplate {
    /// Which layout this is.
    fn kind(&self) -> TemplateKind;

    /// Columns every record must provide.
    fn required_columns(&self) -> &[&'static str];

    /// Adjust document-wide settings before the first record.
    fn prepare(&self, _doc: &mut Document, _ctx: &RenderContext<'_>) {}

    /// Render one record.
    fn render(&self, record: &Record, doc: &mut Document, ctx: &RenderContext<'_>) -> Result<()>;

    /// Columns from `required_columns` missing in `columns`.
    fn missing_columns(&self, columns: &[String]) -> Vec<&'static str> {
        self.required_columns()
            .iter()
            .copied()
            .filter(|c| !columns.iter().any(|col| col == c))
            .collect()
    }
}
