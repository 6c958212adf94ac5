//! Document assembly: one section per record, written once at the end.

use crate::error::{Error, Result};
use crate::markup::NameParser;
use crate::model::{Document, Metadata, SectionStart};
use crate::render::{write_docx, BaseDocument, RenderOptions, RenderResult};
use crate::table::{LoadOptions, Record, Table, TableLoader};
use crate::template::{RecordTemplate, RenderContext};
use std::path::Path;

/// Renders records into a document with the configured layout.
///
/// # Example
///
/// ```no_run
/// use abstractdoc::{Assembler, RenderOptions};
///
/// let assembler = Assembler::new(RenderOptions::new().with_image_dir("image"));
/// let result = assembler.generate("abstracts.xlsx", "abstracts.docx")?;
/// println!("{} sections", result.stats.section_count);
/// # Ok::<(), abstractdoc::Error>(())
/// ```
pub struct Assembler {
    options: RenderOptions,
    load_options: LoadOptions,
    template: Box<dyn RecordTemplate>,
    names: NameParser,
}

impl Assembler {
    /// Create an assembler; the layout is selected from `options.template`.
    pub fn new(options: RenderOptions) -> Self {
        let template = options.template.build();
        Self {
            options,
            load_options: LoadOptions::default(),
            template,
            names: NameParser::new(),
        }
    }

    /// Set the worksheet selection used by [`generate`](Self::generate).
    pub fn with_load_options(mut self, load_options: LoadOptions) -> Self {
        self.load_options = load_options;
        self
    }

    /// The render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The selected layout.
    pub fn template(&self) -> &dyn RecordTemplate {
        self.template.as_ref()
    }

    /// Render records into a new document, in input order.
    ///
    /// The first record fills the document's initial section; each later
    /// record starts a new page section. The first failing record aborts
    /// the whole run. Invalid options are rejected before any record is read.
    pub fn assemble(&self, records: &[Record]) -> Result<Document> {
        self.options.validate()?;
        let ctx = RenderContext::new(&self.options, &self.names);
        let mut doc = Document::new();
        doc.metadata = Metadata {
            title: self.options.title.clone(),
            author: self.options.author.clone(),
            template: Some(self.template.kind().to_string()),
            ..Metadata::now()
        };
        self.template.prepare(&mut doc, &ctx);

        let total = records.len();
        for (i, record) in records.iter().enumerate() {
            if i == 0 {
                doc.first_section_mut().geometry = self.options.geometry;
            } else {
                doc.add_section(self.options.geometry, SectionStart::NewPage);
            }
            log::info!("Rendering record {}/{} (row {})", i + 1, total, record.row);
            self.template.render(record, &mut doc, &ctx)?;
        }

        doc.metadata.record_count = total as u32;
        Ok(doc)
    }

    /// Check that the table provides every column the layout requires.
    pub fn check_columns(&self, table: &Table) -> Result<()> {
        let Some(first) = table.records.first() else {
            return Ok(());
        };
        match self.template.missing_columns(&table.columns).first() {
            Some(column) => Err(Error::MissingColumn {
                row: first.row,
                column: column.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Open the configured base template, if any.
    pub fn base_document(&self) -> Result<Option<BaseDocument>> {
        self.options
            .base_template
            .as_deref()
            .map(BaseDocument::open)
            .transpose()
    }

    /// Load a table, render it and write the DOCX to `output`.
    ///
    /// Nothing is written unless every record renders.
    pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<RenderResult> {
        self.options.validate()?;
        let base = self.base_document()?;
        let table = TableLoader::with_options(self.load_options.clone()).load(input)?;
        self.check_columns(&table)?;

        let doc = self.assemble(&table.records)?;
        let output = output.as_ref();
        let bytes_written = write_docx(&doc, base.as_ref(), output)?;
        Ok(RenderResult::new(output.to_path_buf(), bytes_written, &doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::TemplateKind;

    fn legacy_record(row: usize, title: &str) -> Record {
        Record::new(
            row,
            [
                ("title", title),
                ("authors", "A. Author(1)"),
                ("affiliations", "1 Somewhere"),
                ("abstract", "Body"),
                ("keywords", "k"),
            ],
        )
    }

    #[test]
    fn test_one_section_per_record() {
        let assembler =
            Assembler::new(RenderOptions::new().with_template(TemplateKind::Jscpb2016));
        let records: Vec<_> = (1..=3)
            .map(|i| legacy_record(i, &format!("Title {}", i)))
            .collect();

        let doc = assembler.assemble(&records).unwrap();
        assert_eq!(doc.section_count(), 3);
        assert_eq!(doc.metadata.record_count, 3);
        assert_eq!(doc.metadata.template.as_deref(), Some("jscpb2016"));
        for (i, section) in doc.sections.iter().enumerate() {
            assert_eq!(
                section.paragraphs[0].plain_text(),
                format!("Title {}", i + 1)
            );
            assert_eq!(section.start, SectionStart::NewPage);
            assert_eq!(section.geometry.margin_bottom_mm, 15.0);
        }
    }

    #[test]
    fn test_zero_records() {
        let assembler = Assembler::new(RenderOptions::new());
        let doc = assembler.assemble(&[]).unwrap();
        assert_eq!(doc.section_count(), 1);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_failure_aborts() {
        let assembler =
            Assembler::new(RenderOptions::new().with_template(TemplateKind::Jscpb2016));
        let records = vec![
            legacy_record(1, "ok"),
            Record::new(2, [("title", "missing the rest")]),
        ];
        let err = assembler.assemble(&records).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { row: 2, .. }));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let records = vec![legacy_record(1, "Title")];

        let assembler = Assembler::new(
            RenderOptions::new()
                .with_template(TemplateKind::Jscpb2016)
                .with_default_dpi(0.0),
        );
        assert!(matches!(assembler.assemble(&records), Err(Error::Config(_))));

        let assembler = Assembler::new(RenderOptions::new().with_figure_limits(14.0, -1.0));
        assert!(matches!(assembler.assemble(&[]), Err(Error::Config(_))));
    }

    #[test]
    fn test_generate_validates_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.docx");
        let assembler = Assembler::new(RenderOptions::new().with_default_dpi(0.0));

        let err = assembler
            .generate(dir.path().join("missing.xlsx"), &output)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_check_columns() {
        let assembler = Assembler::new(RenderOptions::new());
        let table = Table {
            sheet_name: "Sheet1".into(),
            sheet_names: vec!["Sheet1".into()],
            columns: vec!["Title".into(), "Name".into()],
            records: vec![Record::new(1, [("Title", "t"), ("Name", "n")])],
        };
        assert!(matches!(
            assembler.check_columns(&table),
            Err(Error::MissingColumn { row: 1, ref column }) if column == "Affiliation"
        ));
    }
}
