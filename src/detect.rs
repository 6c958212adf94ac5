//! Container format detection for spreadsheet inputs and DOCX templates.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Physical container of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// ZIP package (xlsx, xlsm, ods, docx)
    Zip,
    /// OLE2 compound document (legacy xls)
    Ole,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Zip => write!(f, "ZIP package"),
            ContainerFormat::Ole => write!(f, "OLE2 compound document"),
        }
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
/// Empty ZIP archive: PK\x05\x06
const ZIP_EMPTY_MAGIC: &[u8] = &[0x50, 0x4B, 0x05, 0x06];
/// OLE2 header: D0 CF 11 E0 A1 B1 1A E1
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the container format of a file.
///
/// # Example
/// ```no_run
/// use abstractdoc::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("abstracts.xlsx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = Vec::with_capacity(8);
    reader.by_ref().take(8).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the container format from the leading bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ContainerFormat> {
    if data.starts_with(ZIP_MAGIC) || data.starts_with(ZIP_EMPTY_MAGIC) {
        return Ok(ContainerFormat::Zip);
    }
    if data.starts_with(OLE_MAGIC) {
        return Ok(ContainerFormat::Ole);
    }
    Err(Error::UnknownFormat)
}

/// Spreadsheet file extensions the table loader accepts.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Check if a path looks like a readable spreadsheet (extension and magic bytes).
pub fn is_spreadsheet<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);
    ext_ok && detect_format_from_path(path).is_ok()
}

/// Check if a path is a ZIP package that could be a DOCX template.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    matches!(detect_format_from_path(path), Ok(ContainerFormat::Zip))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zip() {
        let data = b"PK\x03\x04\x14\x00\x06\x00";
        assert_eq!(detect_format_from_bytes(data).unwrap(), ContainerFormat::Zip);
    }

    #[test]
    fn test_detect_ole() {
        let data = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ContainerFormat::Ole);
    }

    #[test]
    fn test_detect_unknown() {
        let result = detect_format_from_bytes(b"Title,Name\n");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(b"PK");
        assert!(matches!(result, Err(Error::UnknownFormat)));
        assert!(detect_format_from_bytes(&[]).is_err());
    }

    #[test]
    fn test_is_spreadsheet_rejects_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        std::fs::write(&path, "Title\nFoo\n").unwrap();
        assert!(!is_spreadsheet(&path));
        assert!(!is_docx(&path));
    }
}
