//! Full workshop layout.
//!
//! Renders title, authors and affiliations, DOI, body, an optional figure
//! with its caption, optional references, acknowledgement and funding
//! blocks, and a citation line.

use super::{RecordTemplate, RenderContext, TemplateKind};
use crate::error::Result;
use crate::figure::load_figure;
use crate::markup::{strip_markup, Affiliation, Author};
use crate::model::{Alignment, Document, Paragraph, Section, TextRun, TextStyle};
use crate::table::{split_items, Record};
use serde::{Deserialize, Serialize};

/// Column headers read by the full layout.
pub mod columns {
    /// Title with inline markup
    pub const TITLE: &str = "Title";
    /// Newline-separated author entries
    pub const NAME: &str = "Name";
    /// Newline-separated affiliation entries
    pub const AFFILIATION: &str = "Affiliation";
    /// Contact e-mail
    pub const EMAIL: &str = "e-mail";
    /// DOI suffix
    pub const DOI: &str = "DOI";
    /// Newline-separated body paragraphs
    pub const ABSTRACT: &str = "Abstract";
    /// Figure filename, relative to the image directory
    pub const FIGURE_FILE: &str = "Figure file Name";
    /// Newline-separated figure caption paragraphs
    pub const FIGURE_COMMENT: &str = "Figure comment";
    /// Newline-separated references
    pub const REFERENCES: &str = "References";
    /// Newline-separated acknowledgement paragraphs
    pub const ACKNOWLEDGEMENT: &str = "Acknowledgement";
    /// Newline-separated funding paragraphs
    pub const FUNDING: &str = "Funding";
    /// Program number used in the citation
    pub const PROGRAM_LONG: &str = "Program No. Long";

    /// Columns every record must provide.
    pub const REQUIRED: &[&str] = &[TITLE, NAME, AFFILIATION, EMAIL, DOI, ABSTRACT, PROGRAM_LONG];

    /// Columns whose absence or blankness suppresses a block.
    pub const OPTIONAL: &[&str] = &[FIGURE_FILE, FIGURE_COMMENT, REFERENCES, ACKNOWLEDGEMENT, FUNDING];
}

/// Base font of the full layout.
const BASE_FONT: &str = "Times New Roman";
const BASE_FONT_SIZE: f32 = 10.0;

/// Fixed parts of the citation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationStyle {
    /// Publication year
    pub year: String,
    /// Proceedings title, set in italics
    pub venue: String,
    /// Label preceding the program number
    pub label: String,
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self {
            year: "2016".to_string(),
            venue: "Advances in Neuroinformatics IV".to_string(),
            label: "AINI 2016 and INCF Nodes Workshop Abstract".to_string(),
        }
    }
}

/// The full layout.
#[derive(Debug, Clone, Default)]
pub struct FullTemplate {
    _private: (),
}

impl FullTemplate {
    /// Create the layout.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

/// Fields of one record, parsed before anything is emitted.
struct Entry {
    title: String,
    authors: Vec<Author>,
    affiliations: Vec<Affiliation>,
    email: String,
    doi: String,
    body: Vec<String>,
    figure_file: Option<String>,
    figure_comment: Vec<String>,
    references: Vec<String>,
    acknowledgement: Vec<String>,
    funding: Vec<String>,
    program: String,
}

impl Entry {
    fn parse(record: &Record, ctx: &RenderContext<'_>) -> Result<Self> {
        let row = record.row;
        let authors = split_items(&record.text(columns::NAME)?)
            .iter()
            .map(|item| ctx.names.parse_author(item, row))
            .collect::<Result<Vec<_>>>()?;
        let affiliations = split_items(&record.text(columns::AFFILIATION)?)
            .iter()
            .map(|item| ctx.names.parse_affiliation(item, row))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: record.text(columns::TITLE)?.trim().to_string(),
            authors,
            affiliations,
            email: record.text(columns::EMAIL)?.trim().to_string(),
            doi: record.text(columns::DOI)?.trim().to_string(),
            body: split_items(&record.text(columns::ABSTRACT)?),
            figure_file: record
                .optional(columns::FIGURE_FILE)
                .map(|f| f.trim().to_string()),
            figure_comment: record.items(columns::FIGURE_COMMENT),
            references: record.items(columns::REFERENCES),
            acknowledgement: record.items(columns::ACKNOWLEDGEMENT),
            funding: record.items(columns::FUNDING),
            program: record.text(columns::PROGRAM_LONG)?.trim().to_string(),
        })
    }
}

impl RecordTemplate for FullTemplate {
    fn kind(&self) -> TemplateKind {
        TemplateKind::Aini2016
    }

    fn required_columns(&self) -> &[&'static str] {
        columns::REQUIRED
    }

    fn prepare(&self, doc: &mut Document, _ctx: &RenderContext<'_>) {
        doc.defaults.font_name = Some(BASE_FONT.to_string());
        doc.defaults.font_size = Some(BASE_FONT_SIZE);
    }

    fn render(&self, record: &Record, doc: &mut Document, ctx: &RenderContext<'_>) -> Result<()> {
        let entry = Entry::parse(record, ctx)?;
        log::info!("{}", entry.title);

        // The figure is loaded first so a failure leaves the section untouched.
        let figure = match &entry.figure_file {
            Some(file) => {
                let path = ctx.figure_path(file);
                let figure = load_figure(
                    &path,
                    &ctx.options.figure_limits,
                    ctx.options.default_dpi,
                )?;
                let (width_cm, height_cm) = (figure.size.width_cm, figure.size.height_cm);
                Some((doc.add_resource(figure.resource), width_cm, height_cm))
            }
            None => None,
        };

        let section = doc.current_section_mut();

        write_title(section, &entry, ctx);
        write_people(section, &entry);

        section.add_paragraph(
            Paragraph::with_text(format!("DOI:{}", entry.doi))
                .aligned(Alignment::Center)
                .space_after(12.0),
        );

        for (i, item) in entry.body.iter().enumerate() {
            let mut p = Paragraph::new()
                .aligned(Alignment::Justify)
                .line_spacing(11.0)
                .space_after(2.0);
            if i > 0 {
                p = p.first_line_indent(12.0);
            }
            p.add_markup(ctx.markup(item), &TextStyle::default());
            section.add_paragraph(p);
        }
        section.set_trailing_space_after(12.0);

        if let Some((id, width_cm, height_cm)) = figure {
            let mut p = Paragraph::new().aligned(Alignment::Center);
            p.add_image(id, width_cm, height_cm);
            section.add_paragraph(p);
            write_lead_block(section, &entry.figure_comment, "Figure: ", ctx);
        }
        section.set_trailing_space_after(14.0);

        if !entry.references.is_empty() {
            let mut header = Paragraph::new().line_spacing(11.0).space_after(0.0);
            header.add_run(TextRun::bold("References:"));
            section.add_paragraph(header);
            for item in &entry.references {
                let mut p = Paragraph::new()
                    .aligned(Alignment::Justify)
                    .line_spacing(10.0)
                    .space_after(0.0);
                p.add_markup(ctx.markup(item), &TextStyle::default());
                section.add_paragraph(p);
            }
        }
        section.set_trailing_space_after(10.0);

        // Each block step closes with 10 pt even when the block is absent.
        write_lead_block(section, &entry.acknowledgement, "Acknowledgement: ", ctx);
        section.set_trailing_space_after(10.0);

        write_lead_block(section, &entry.funding, "Funding: ", ctx);
        section.set_trailing_space_after(10.0);

        write_citation(section, &entry, ctx);
        Ok(())
    }
}

fn write_title(section: &mut Section, entry: &Entry, ctx: &RenderContext<'_>) {
    let mut style = TextStyle::bold().sized(12.0);
    style.italic = true;

    let mut p = Paragraph::new()
        .aligned(Alignment::Center)
        .space_before(25.0)
        .space_after(14.0);
    p.add_markup(ctx.markup(&entry.title), &style);
    section.add_paragraph(p);
}

/// Authors, affiliations and e-mail share one centred paragraph.
fn write_people(section: &mut Section, entry: &Entry) {
    let mut p = Paragraph::new()
        .aligned(Alignment::Center)
        .line_spacing(12.0)
        .space_after(12.0);

    for (i, author) in entry.authors.iter().enumerate() {
        if i > 0 {
            p.add_run(TextRun::bold(", "));
        }
        p.add_run(TextRun::bold(author.non_breaking_name()));
        if !author.refs.is_empty() {
            let mut style = TextStyle::bold();
            style.superscript = true;
            p.add_run(TextRun::styled(format!("\u{00A0}{}", author.refs), style));
        }
    }

    p.add_line_break();
    for (i, affiliation) in entry.affiliations.iter().enumerate() {
        if i > 0 {
            p.add_text(", ");
        }
        if !affiliation.refs.is_empty() {
            p.add_run(TextRun::superscript(format!("{}\u{00A0}", affiliation.refs)));
        }
        p.add_text(affiliation.name.as_str());
    }

    if !entry.email.is_empty() {
        p.add_line_break();
        p.add_text(entry.email.as_str());
    }

    section.add_paragraph(p);
}

/// Paragraphs where the first one opens with a bold lead such as "Funding: ".
fn write_lead_block(section: &mut Section, items: &[String], lead: &str, ctx: &RenderContext<'_>) {
    for (i, item) in items.iter().enumerate() {
        let mut p = Paragraph::new()
            .aligned(Alignment::Justify)
            .line_spacing(10.0)
            .space_after(0.0);
        if i == 0 {
            p.add_run(TextRun::bold(lead));
        }
        p.add_markup(ctx.markup(item), &TextStyle::default());
        section.add_paragraph(p);
    }
}

fn write_citation(section: &mut Section, entry: &Entry, ctx: &RenderContext<'_>) {
    let citation = &ctx.options.citation;
    let names = entry
        .authors
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let title = strip_markup(&entry.title)
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    let mut p = Paragraph::new()
        .aligned(Alignment::Justify)
        .line_spacing(10.0);
    p.add_run(TextRun::bold("Citation: "));
    p.add_text(format!("{} ({}). {}. ", names, citation.year, title));
    p.add_run(TextRun::italic(format!("{}. ", citation.venue)));
    p.add_text(format!(
        "{}: {}. DOI:{}",
        citation.label, entry.program, entry.doi
    ));
    section.add_paragraph(p);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::markup::NameParser;
    use crate::model::InlineContent;
    use crate::render::RenderOptions;

    fn base_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Title", "Spike <i>timing</i> in cortex"),
            ("Name", "Taro Yamada(1)(2)\nHanako Sato(2)"),
            ("Affiliation", "(1)RIKEN BSI\n(2)Univ Tokyo"),
            ("e-mail", "taro@example.org"),
            ("DOI", " 10.14931/aini2016.pl.01 "),
            ("Abstract", "First paragraph.\nSecond paragraph.\nThird paragraph."),
            ("Program No. Long", "P-01"),
        ]
    }

    fn render(fields: Vec<(&'static str, &'static str)>) -> Result<Document> {
        let options = RenderOptions::new();
        let names = NameParser::new();
        let ctx = RenderContext::new(&options, &names);
        let template = FullTemplate::new();
        let mut doc = Document::new();
        template.prepare(&mut doc, &ctx);
        template.render(&Record::new(1, fields), &mut doc, &ctx)?;
        Ok(doc)
    }

    #[test]
    fn test_body_indents_after_first_item() {
        let doc = render(base_fields()).unwrap();
        let section = &doc.sections[0];

        // title, people, DOI, three body paragraphs, citation
        assert_eq!(section.paragraph_count(), 7);
        let body = &section.paragraphs[3..6];
        assert_eq!(body[0].style.first_line_indent, None);
        assert_eq!(body[1].style.first_line_indent, Some(12.0));
        assert_eq!(body[2].style.first_line_indent, Some(12.0));
        assert_eq!(body[0].style.space_after, Some(2.0));
        // no figure or closing blocks: the paragraph before the citation ends at 10
        assert_eq!(body[2].style.space_after, Some(10.0));
    }

    #[test]
    fn test_blank_figure_is_skipped() {
        let mut fields = base_fields();
        fields.push(("Figure file Name", "  "));
        fields.push(("Figure comment", "Ignored caption"));
        let doc = render(fields).unwrap();

        assert!(doc.resources.is_empty());
        assert!(!doc.sections[0].paragraphs.iter().any(|p| p.has_image()));
        assert!(!doc.plain_text().contains("Figure:"));
    }

    #[test]
    fn test_people_paragraph() {
        let doc = render(base_fields()).unwrap();
        let people = &doc.sections[0].paragraphs[1];

        let runs: Vec<_> = people.runs().collect();
        assert_eq!(runs[0].text, "Taro\u{00A0}Yamada");
        assert!(runs[0].style.bold);
        assert_eq!(runs[1].text, "\u{00A0}1, 2");
        assert!(runs[1].style.superscript && runs[1].style.bold);
        assert_eq!(runs[2].text, ", ");
        assert!(runs[2].style.bold);

        let breaks = people
            .content
            .iter()
            .filter(|c| matches!(c, InlineContent::LineBreak))
            .count();
        assert_eq!(breaks, 2);
        assert!(people.plain_text().ends_with("\ntaro@example.org"));
        assert!(people.plain_text().contains("1\u{00A0}RIKEN BSI, 2\u{00A0}Univ Tokyo"));
    }

    #[test]
    fn test_optional_blocks_and_citation() {
        let mut fields = base_fields();
        fields.push(("References", "Ref A\nRef B"));
        fields.push(("Acknowledgement", "Thanks."));
        fields.push(("Funding", "Grant 1"));
        let doc = render(fields).unwrap();
        let section = &doc.sections[0];
        let text = doc.plain_text();

        assert!(text.contains("References:\nRef A\nRef B"));
        assert!(text.contains("Acknowledgement: Thanks."));
        assert!(text.contains("Funding: Grant 1"));

        let citation = section.paragraphs.last().unwrap().plain_text();
        assert_eq!(
            citation,
            "Citation: Taro Yamada, Hanako Sato (2016). Spike timing in cortex. \
             Advances in Neuroinformatics IV. \
             AINI 2016 and INCF Nodes Workshop Abstract: P-01. DOI:10.14931/aini2016.pl.01"
        );

        let funding = &section.paragraphs[section.paragraph_count() - 2];
        assert_eq!(funding.style.space_after, Some(10.0));
    }

    #[test]
    fn test_document_defaults() {
        let doc = render(base_fields()).unwrap();
        assert_eq!(doc.defaults.font_name.as_deref(), Some("Times New Roman"));
        assert_eq!(doc.defaults.font_size, Some(10.0));
    }

    #[test]
    fn test_malformed_author() {
        let mut fields = base_fields();
        fields[1] = ("Name", "(1)");
        let err = render(fields).unwrap_err();
        assert!(matches!(err, Error::AuthorParse { row: 1, .. }));
    }

    #[test]
    fn test_missing_figure_file() {
        let mut fields = base_fields();
        fields.push(("Figure file Name", "does-not-exist.png"));
        let err = render(fields).unwrap_err();
        assert!(matches!(err, Error::Figure { .. }));
    }
}
