//! Section-level types.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// Page size and margins of a section, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width
    pub width_mm: f64,
    /// Page height
    pub height_mm: f64,
    /// Top margin
    pub margin_top_mm: f64,
    /// Right margin
    pub margin_right_mm: f64,
    /// Bottom margin
    pub margin_bottom_mm: f64,
    /// Left margin
    pub margin_left_mm: f64,
    /// Page orientation
    #[serde(default)]
    pub orientation: Orientation,
}

impl PageGeometry {
    /// A4 portrait with 20 mm top/left/right and 15 mm bottom margins.
    pub fn a4_abstract() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_top_mm: 20.0,
            margin_right_mm: 20.0,
            margin_bottom_mm: 15.0,
            margin_left_mm: 20.0,
            orientation: Orientation::Portrait,
        }
    }

    /// US Letter portrait with 1 inch margins.
    pub fn letter() -> Self {
        Self {
            width_mm: 215.9,
            height_mm: 279.4,
            margin_top_mm: 25.4,
            margin_right_mm: 25.4,
            margin_bottom_mm: 25.4,
            margin_left_mm: 25.4,
            orientation: Orientation::Portrait,
        }
    }

    /// Width available for content between the side margins.
    pub fn text_width_mm(&self) -> f64 {
        self.width_mm - self.margin_left_mm - self.margin_right_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_abstract()
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Portrait (default)
    #[default]
    Portrait,
    /// Landscape
    Landscape,
}

/// How a section begins relative to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStart {
    /// Start on a new page
    #[default]
    NewPage,
    /// Continue on the same page
    Continuous,
}

/// One page-geometry-scoped region of the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    /// Page geometry
    pub geometry: PageGeometry,

    /// Section start type
    pub start: SectionStart,

    /// Paragraphs in order
    pub paragraphs: Vec<Paragraph>,
}

impl Section {
    /// Create an empty section.
    pub fn new(geometry: PageGeometry, start: SectionStart) -> Self {
        Self {
            geometry,
            start,
            paragraphs: Vec::new(),
        }
    }

    /// Append a paragraph and return it for further editing.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) -> &mut Paragraph {
        self.paragraphs.push(paragraph);
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// The most recently added paragraph.
    pub fn last_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        self.paragraphs.last_mut()
    }

    /// Set the space after the most recently added paragraph, if any.
    pub fn set_trailing_space_after(&mut self, pt: f32) {
        if let Some(p) = self.last_paragraph_mut() {
            p.style.space_after = Some(pt);
        }
    }

    /// Number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Get plain text content of the section.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_geometry() {
        let g = PageGeometry::a4_abstract();
        assert_eq!(g.width_mm, 210.0);
        assert_eq!(g.height_mm, 297.0);
        assert_eq!(g.margin_bottom_mm, 15.0);
        assert_eq!(g.text_width_mm(), 170.0);
    }

    #[test]
    fn test_trailing_space_after() {
        let mut section = Section::default();
        section.set_trailing_space_after(10.0);
        assert_eq!(section.paragraph_count(), 0);

        section.add_paragraph(Paragraph::with_text("a"));
        section.add_paragraph(Paragraph::with_text("b"));
        section.set_trailing_space_after(14.0);
        assert_eq!(section.paragraphs[0].style.space_after, None);
        assert_eq!(section.paragraphs[1].style.space_after, Some(14.0));
    }

    #[test]
    fn test_section_plain_text() {
        let mut section = Section::new(PageGeometry::letter(), SectionStart::Continuous);
        section.add_paragraph(Paragraph::with_text("Title"));
        section.add_paragraph(Paragraph::with_text("Body"));
        assert_eq!(section.plain_text(), "Title\nBody");
    }
}
