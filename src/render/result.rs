//! Rendering result with metadata and statistics.

use crate::model::{Document, InlineContent, Metadata};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of writing a document, including its location and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Where the document was written
    pub output: PathBuf,

    /// Size of the written file in bytes
    pub bytes_written: usize,

    /// Document metadata
    pub metadata: Metadata,

    /// Content statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(output: PathBuf, bytes_written: usize, doc: &Document) -> Self {
        Self {
            output,
            bytes_written,
            metadata: doc.metadata.clone(),
            stats: RenderStats::from_document(doc),
        }
    }
}

/// Statistics collected from an assembled document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of sections (one per record)
    pub section_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of text runs
    pub run_count: u32,

    /// Number of embedded figures
    pub image_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        for section in &doc.sections {
            stats.section_count += 1;
            for paragraph in &section.paragraphs {
                stats.paragraph_count += 1;
                for content in &paragraph.content {
                    match content {
                        InlineContent::Text(run) => {
                            stats.run_count += 1;
                            stats.count_text(&run.text);
                        }
                        InlineContent::Image { .. } => stats.image_count += 1,
                        InlineContent::LineBreak => {}
                    }
                }
            }
        }
        stats
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Paragraph, TextRun};

    #[test]
    fn test_render_stats_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_render_stats_from_document() {
        let mut doc = Document::new();
        let mut p = Paragraph::with_text("Spike timing ");
        p.add_run(TextRun::italic("in vivo"));
        p.add_line_break();
        p.add_image("image1", 5.0, 2.0);
        doc.first_section_mut().add_paragraph(p);
        doc.add_section(Default::default(), Default::default())
            .add_paragraph(Paragraph::with_text("Second"));

        let stats = RenderStats::from_document(&doc);
        assert_eq!(stats.section_count, 2);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.run_count, 3);
        assert_eq!(stats.image_count, 1);
        assert_eq!(stats.word_count, 5);
    }

    #[test]
    fn test_render_result_new() {
        let doc = Document::new();
        let result = RenderResult::new(PathBuf::from("out.docx"), 1024, &doc);
        assert_eq!(result.bytes_written, 1024);
        assert_eq!(result.stats.section_count, 1);
        assert_eq!(result.stats.paragraph_count, 0);
    }
}
