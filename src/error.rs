//! Error types for abstractdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for abstractdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, rendering or writing abstracts.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not a recognised spreadsheet or DOCX container.
    #[error("Unknown file format: not a spreadsheet or DOCX container")]
    UnknownFormat,

    /// Error reported by the spreadsheet reader.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The workbook has no worksheets.
    #[error("Workbook contains no worksheets")]
    EmptyWorkbook,

    /// The requested worksheet does not exist.
    #[error("Worksheet not found: {0}")]
    SheetNotFound(String),

    /// A required column is absent from the table.
    #[error("Row {row}: missing required column '{column}'")]
    MissingColumn {
        /// 1-indexed data row
        row: usize,
        /// Column header that was looked up
        column: String,
    },

    /// An author entry does not match the `Name (refs)` pattern.
    #[error("Row {row}: malformed author entry '{text}'")]
    AuthorParse {
        /// 1-indexed data row
        row: usize,
        /// Offending author text
        text: String,
    },

    /// An affiliation entry does not match the `(refs)Name` pattern.
    #[error("Row {row}: malformed affiliation entry '{text}'")]
    AffiliationParse {
        /// 1-indexed data row
        row: usize,
        /// Offending affiliation text
        text: String,
    },

    /// A figure file could not be read or decoded.
    #[error("Figure error ({}): {message}", path.display())]
    Figure {
        /// Path of the figure file
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// The base DOCX template is unusable.
    #[error("Template error: {0}")]
    Template(String),

    /// Error writing document XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error reading or writing the DOCX archive.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error was caused by malformed record content rather than I/O.
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Error::MissingColumn { .. } | Error::AuthorParse { .. } | Error::AffiliationParse { .. }
        )
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Spreadsheet(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Other(format!("Image decoding error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(
            err.to_string(),
            "Unknown file format: not a spreadsheet or DOCX container"
        );

        let err = Error::AuthorParse {
            row: 3,
            text: "Jane) Doe".to_string(),
        };
        assert_eq!(err.to_string(), "Row 3: malformed author entry 'Jane) Doe'");
    }

    #[test]
    fn test_figure_error_display() {
        let err = Error::Figure {
            path: PathBuf::from("image/fig1.png"),
            message: "file not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Figure error (image/fig1.png): file not found"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_content_error_classification() {
        let err = Error::MissingColumn {
            row: 1,
            column: "Title".to_string(),
        };
        assert!(err.is_content_error());
        assert!(!Error::EmptyWorkbook.is_content_error());
    }
}
