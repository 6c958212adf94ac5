//! Minimal layout: title, authors, affiliations, body and keywords.

use super::{RecordTemplate, RenderContext, TemplateKind};
use crate::error::Result;
use crate::model::{Document, Paragraph, TextRun, TextStyle};
use crate::table::Record;

/// Column headers read by the minimal layout.
pub mod columns {
    /// Title with inline markup
    pub const TITLE: &str = "title";
    /// Author line with `(n)` reference markers
    pub const AUTHORS: &str = "authors";
    /// Affiliation text
    pub const AFFILIATIONS: &str = "affiliations";
    /// Abstract body with inline markup
    pub const ABSTRACT: &str = "abstract";
    /// Keywords
    pub const KEYWORDS: &str = "keywords";

    /// Every column the layout reads.
    pub const ALL: &[&str] = &[TITLE, AUTHORS, AFFILIATIONS, ABSTRACT, KEYWORDS];
}

/// The minimal layout.
#[derive(Debug, Clone, Default)]
pub struct LegacyTemplate {
    _private: (),
}

impl LegacyTemplate {
    /// Create the layout.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl RecordTemplate for LegacyTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::Jscpb2016
    }

    fn required_columns(&self) -> &[&'static str] {
        columns::ALL
    }

    fn render(&self, record: &Record, doc: &mut Document, ctx: &RenderContext<'_>) -> Result<()> {
        let title = record.text(columns::TITLE)?;
        let authors = record.text(columns::AUTHORS)?;
        let affiliations = record.text(columns::AFFILIATIONS)?;
        let body = record.text(columns::ABSTRACT)?;
        let keywords = record.text(columns::KEYWORDS)?;
        log::info!("{}", title);

        let section = doc.current_section_mut();

        // Title
        let mut p = Paragraph::new();
        p.add_markup(ctx.markup(&title), &TextStyle::bold().sized(12.0));
        section.add_paragraph(p);

        // Authors
        let mut p = Paragraph::new();
        for (text, is_marker) in ctx.names.split_markers(&authors) {
            if is_marker {
                p.add_run(TextRun::superscript(text));
            } else {
                p.add_text(text);
            }
        }
        section.add_paragraph(p);

        // Affiliations
        let mut p = Paragraph::new();
        p.add_run(TextRun::styled(affiliations, TextStyle::italic().sized(9.0)));
        section.add_paragraph(p);

        // Abstract body
        let mut p = Paragraph::new();
        p.add_markup(ctx.markup(&body), &TextStyle::default());
        section.add_paragraph(p);

        // Keywords
        let mut p = Paragraph::with_text("Keywords: ");
        p.add_run(TextRun::italic(keywords));
        section.add_paragraph(p);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::markup::NameParser;
    use crate::render::RenderOptions;

    fn record() -> Record {
        Record::new(
            1,
            [
                ("title", "Ca<sup>2+</sup> waves"),
                ("authors", "A. Sato(1), B. Ito(2)"),
                ("affiliations", "1 Univ A, 2 Univ B"),
                ("abstract", "We studied <i>in vivo</i> signals."),
                ("keywords", "calcium, imaging"),
            ],
        )
    }

    #[test]
    fn test_render_minimal_layout() {
        let options = RenderOptions::new();
        let names = NameParser::new();
        let ctx = RenderContext::new(&options, &names);
        let mut doc = Document::new();

        LegacyTemplate::new().render(&record(), &mut doc, &ctx).unwrap();

        let section = &doc.sections[0];
        assert_eq!(section.paragraph_count(), 5);

        let title: Vec<_> = section.paragraphs[0].runs().collect();
        assert!(title.iter().all(|r| r.style.bold && r.style.font_size == Some(12.0)));
        assert!(title[1].style.superscript);
        assert_eq!(section.paragraphs[0].plain_text(), "Ca2+ waves");

        let authors: Vec<_> = section.paragraphs[1].runs().collect();
        assert_eq!(authors[1].text, "(1)");
        assert!(authors[1].style.superscript);
        assert!(!authors[0].style.superscript);

        let affiliation = section.paragraphs[2].runs().next().unwrap();
        assert!(affiliation.style.italic);
        assert_eq!(affiliation.style.font_size, Some(9.0));

        assert_eq!(
            section.paragraphs[4].plain_text(),
            "Keywords: calcium, imaging"
        );
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let options = RenderOptions::new();
        let names = NameParser::new();
        let ctx = RenderContext::new(&options, &names);
        let mut doc = Document::new();
        let record = Record::new(2, [("title", "Only a title")]);

        let err = LegacyTemplate::new()
            .render(&record, &mut doc, &ctx)
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { row: 2, .. }));
    }
}
