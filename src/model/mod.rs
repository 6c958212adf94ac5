//! Document model types for rendered abstracts.
//!
//! This module defines the intermediate representation that bridges the
//! template layouts and the output writers. Templates build sections of
//! paragraphs; the DOCX, text and JSON renderers consume them.

mod document;
mod paragraph;
mod resource;
mod section;

pub use document::{Document, DocumentDefaults, Metadata};
pub use paragraph::{Alignment, InlineContent, Paragraph, ParagraphStyle, TextRun, TextStyle};
pub use resource::Resource;
pub use section::{Orientation, PageGeometry, Section, SectionStart};
