//! Rendering options and configuration.

use crate::error::{Error, Result};
use crate::figure::FigureLimits;
use crate::model::PageGeometry;
use crate::template::{CitationStyle, TemplateKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback resolution when an image carries none.
pub const DEFAULT_DPI: f64 = 72.0;

/// Options for rendering records into a document.
///
/// Missing fields in a JSON options file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Record layout
    pub template: TemplateKind,

    /// Directory figure filenames are resolved against
    pub image_dir: Option<PathBuf>,

    /// DOCX whose styles are cloned into the output
    pub base_template: Option<PathBuf>,

    /// Maximum figure display size
    pub figure_limits: FigureLimits,

    /// Resolution used when an image declares none
    pub default_dpi: f64,

    /// Page geometry of every section
    pub geometry: PageGeometry,

    /// Keep raw markup tags in the output text
    pub debug_markup: bool,

    /// Fixed parts of the citation line
    pub citation: CitationStyle,

    /// Document title written to the package properties
    pub title: Option<String>,

    /// Document author written to the package properties
    pub author: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        options.validate()?;
        log::debug!("Loaded render options from {}", path.display());
        Ok(options)
    }

    /// Check that numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.default_dpi.is_finite() && self.default_dpi > 0.0) {
            return Err(Error::Config(format!(
                "default DPI must be positive, got {}",
                self.default_dpi
            )));
        }
        let limits = &self.figure_limits;
        if !(limits.max_width_cm > 0.0 && limits.max_height_cm > 0.0) {
            return Err(Error::Config(format!(
                "figure limits must be positive, got {}x{} cm",
                limits.max_width_cm, limits.max_height_cm
            )));
        }
        if self.geometry.text_width_mm() <= 0.0 {
            return Err(Error::Config("page margins leave no text width".into()));
        }
        Ok(())
    }

    /// Set the record layout.
    pub fn with_template(mut self, template: TemplateKind) -> Self {
        self.template = template;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set the base DOCX template.
    pub fn with_base_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_template = Some(path.into());
        self
    }

    /// Set the maximum figure size in centimetres.
    pub fn with_figure_limits(mut self, max_width_cm: f64, max_height_cm: f64) -> Self {
        self.figure_limits = FigureLimits {
            max_width_cm,
            max_height_cm,
        };
        self
    }

    /// Set the fallback image resolution.
    pub fn with_default_dpi(mut self, dpi: f64) -> Self {
        self.default_dpi = dpi;
        self
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Keep raw markup tags in the output text.
    pub fn with_debug_markup(mut self, debug: bool) -> Self {
        self.debug_markup = debug;
        self
    }

    /// Set the citation style.
    pub fn with_citation(mut self, citation: CitationStyle) -> Self {
        self.citation = citation;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            template: TemplateKind::default(),
            image_dir: None,
            base_template: None,
            figure_limits: FigureLimits::default(),
            default_dpi: DEFAULT_DPI,
            geometry: PageGeometry::a4_abstract(),
            debug_markup: false,
            citation: CitationStyle::default(),
            title: None,
            author: None,
        }
    }
}
