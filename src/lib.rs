//! # abstractdoc
//!
//! Conference-abstract typesetting library for Rust.
//!
//! This library reads a spreadsheet of abstract submissions (one row per
//! abstract) and renders every row into its own section of a DOCX document,
//! applying inline markup and one of two layouts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use abstractdoc::{generate, load_records, render, Assembler, RenderOptions};
//!
//! fn main() -> abstractdoc::Result<()> {
//!     // One call: spreadsheet in, DOCX out
//!     generate("abstracts.xlsx", "abstracts.docx")?;
//!
//!     // Or step by step
//!     let records = load_records("abstracts.xlsx")?;
//!     let assembler = Assembler::new(RenderOptions::new().with_image_dir("image"));
//!     let doc = assembler.assemble(&records)?;
//!     println!("{}", render::to_text(&doc)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Spreadsheet input**: xlsx, xlsm, xls and ods via calamine
//! - **Inline markup**: `<i>`, `<sup>` and `<sub>` tags in cell text
//! - **Two layouts**: a minimal one and a full workshop layout with figures,
//!   references and a citation line
//! - **Figure sizing**: physical size from image resolution, clamped to limits
//! - **Base templates**: styles cloned from an existing DOCX

pub mod assemble;
pub mod detect;
pub mod error;
pub mod figure;
pub mod markup;
pub mod model;
pub mod render;
pub mod table;
pub mod template;

// Re-export commonly used types
pub use assemble::Assembler;
pub use detect::{detect_format_from_bytes, detect_format_from_path, ContainerFormat};
pub use error::{Error, Result};
pub use figure::{FigureLimits, FigureSize};
pub use markup::{strip_markup, tokenize, InlineMarkupRun, MarkupTokenizer};
pub use model::{
    Alignment, Document, InlineContent, Metadata, PageGeometry, Paragraph, ParagraphStyle,
    Resource, Section, SectionStart, TextRun, TextStyle,
};
pub use render::{BaseDocument, JsonFormat, RenderOptions, RenderResult, RenderStats};
pub use table::{load_records, load_records_with_options, LoadOptions, Record, Table};
pub use template::{CitationStyle, TemplateKind};

use std::path::{Path, PathBuf};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Render a spreadsheet to a DOCX file with the default (full) layout.
///
/// # Example
///
/// ```no_run
/// use abstractdoc::generate;
///
/// let result = generate("abstracts.xlsx", "abstracts.docx").unwrap();
/// println!("Wrote {} sections", result.stats.section_count);
/// ```
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<RenderResult> {
    Assembler::new(RenderOptions::default()).generate(input, output)
}

/// Render a spreadsheet to a DOCX file with custom options.
///
/// # Example
///
/// ```no_run
/// use abstractdoc::{generate_with_options, RenderOptions, TemplateKind};
///
/// let options = RenderOptions::new()
///     .with_template(TemplateKind::Jscpb2016)
///     .with_image_dir("image");
/// generate_with_options("abstracts.xlsx", "abstracts.docx", options).unwrap();
/// ```
pub fn generate_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: RenderOptions,
) -> Result<RenderResult> {
    Assembler::new(options).generate(input, output)
}

/// Render records into a document without writing it.
pub fn render_records(records: &[Record], options: RenderOptions) -> Result<Document> {
    Assembler::new(options).assemble(records)
}

/// Render a spreadsheet to a plain-text preview.
///
/// # Example
///
/// ```no_run
/// use abstractdoc::{to_text, RenderOptions};
///
/// let text = to_text("abstracts.xlsx", RenderOptions::default()).unwrap();
/// println!("{}", text);
/// ```
pub fn to_text<P: AsRef<Path>>(input: P, options: RenderOptions) -> Result<String> {
    let records = load_records(input)?;
    let doc = render_records(&records, options)?;
    render::to_text(&doc)
}

/// Render a spreadsheet to the JSON document model.
pub fn to_json<P: AsRef<Path>>(
    input: P,
    options: RenderOptions,
    format: JsonFormat,
) -> Result<String> {
    let records = load_records(input)?;
    let doc = render_records(&records, options)?;
    render::to_json(&doc, format)
}

/// Builder for loading and rendering abstracts.
///
/// # Example
///
/// ```no_run
/// use abstractdoc::{AbstractDoc, TemplateKind};
///
/// AbstractDoc::new()
///     .with_template(TemplateKind::Aini2016)
///     .with_image_dir("./image")
///     .with_base_template("base.docx")
///     .load("abstracts.xlsx")?
///     .save("abstracts.docx")?;
/// # Ok::<(), abstractdoc::Error>(())
/// ```
pub struct AbstractDoc {
    load_options: LoadOptions,
    render_options: RenderOptions,
}

impl AbstractDoc {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            load_options: LoadOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Replace all render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Select the layout.
    pub fn with_template(mut self, template: TemplateKind) -> Self {
        self.render_options = self.render_options.with_template(template);
        self
    }

    /// Set the figure image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.render_options = self.render_options.with_image_dir(dir);
        self
    }

    /// Clone styles from a DOCX template.
    pub fn with_base_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.render_options = self.render_options.with_base_template(path);
        self
    }

    /// Set the maximum figure size in centimetres.
    pub fn with_figure_limits(mut self, max_width_cm: f64, max_height_cm: f64) -> Self {
        self.render_options = self
            .render_options
            .with_figure_limits(max_width_cm, max_height_cm);
        self
    }

    /// Set the fallback image resolution.
    pub fn with_default_dpi(mut self, dpi: f64) -> Self {
        self.render_options = self.render_options.with_default_dpi(dpi);
        self
    }

    /// Keep raw markup tags in the output.
    pub fn debug_markup(mut self) -> Self {
        self.render_options = self.render_options.with_debug_markup(true);
        self
    }

    /// Read a worksheet by name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.load_options = self.load_options.with_sheet_name(name);
        self
    }

    /// Read a worksheet by zero-based index.
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.load_options = self.load_options.with_sheet_index(index);
        self
    }

    /// Load and render a spreadsheet.
    pub fn load<P: AsRef<Path>>(self, input: P) -> Result<AbstractDocResult> {
        self.render_options.validate()?;
        let assembler = Assembler::new(self.render_options);
        let base = assembler.base_document()?;
        let table = table::TableLoader::with_options(self.load_options).load(input)?;
        assembler.check_columns(&table)?;
        let document = assembler.assemble(&table.records)?;
        Ok(AbstractDocResult { document, base })
    }

    /// Render already-loaded records.
    pub fn render(self, records: &[Record]) -> Result<AbstractDocResult> {
        self.render_options.validate()?;
        let assembler = Assembler::new(self.render_options);
        let base = assembler.base_document()?;
        let document = assembler.assemble(records)?;
        Ok(AbstractDocResult { document, base })
    }
}

impl Default for AbstractDoc {
    fn default() -> Self {
        Self::new()
    }
}

/// A rendered document ready for output.
pub struct AbstractDocResult {
    /// The assembled document
    pub document: Document,
    base: Option<BaseDocument>,
}

impl AbstractDocResult {
    /// Serialize to DOCX bytes.
    pub fn to_docx_bytes(&self) -> Result<Vec<u8>> {
        render::to_docx_bytes(&self.document, self.base.as_ref())
    }

    /// Write the DOCX file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<RenderResult> {
        let path = path.as_ref();
        let bytes_written = render::write_docx(&self.document, self.base.as_ref(), path)?;
        Ok(RenderResult::new(path.to_path_buf(), bytes_written, &self.document))
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Content statistics.
    pub fn stats(&self) -> RenderStats {
        RenderStats::from_document(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
