//! Table loading options.

use serde::{Deserialize, Serialize};

/// Options for loading records from a spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Which worksheet holds the records
    #[serde(default)]
    pub sheet: SheetSelection,

    /// Trim surrounding whitespace from header cells
    #[serde(default = "default_trim_headers")]
    pub trim_headers: bool,
}

fn default_trim_headers() -> bool {
    true
}

impl LoadOptions {
    /// Create new load options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a worksheet by name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet = SheetSelection::Name(name.into());
        self
    }

    /// Select a worksheet by 0-based index.
    pub fn with_sheet_index(mut self, index: usize) -> Self {
        self.sheet = SheetSelection::Index(index);
        self
    }

    /// Keep header cells exactly as written.
    pub fn raw_headers(mut self) -> Self {
        self.trim_headers = false;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: SheetSelection::First,
            trim_headers: default_trim_headers(),
        }
    }
}

/// Worksheet selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetSelection {
    /// The first worksheet in the workbook
    #[default]
    First,
    /// A worksheet by 0-based position
    Index(usize),
    /// A worksheet by name
    Name(String),
}

impl SheetSelection {
    /// Parse a CLI-style selector: a number selects by index, anything else by name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return SheetSelection::First;
        }
        match s.parse::<usize>() {
            Ok(index) => SheetSelection::Index(index),
            Err(_) => SheetSelection::Name(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_options_builder() {
        let options = LoadOptions::new().with_sheet_name("Abstracts").raw_headers();
        assert_eq!(options.sheet, SheetSelection::Name("Abstracts".to_string()));
        assert!(!options.trim_headers);
    }

    #[test]
    fn test_sheet_selection_parse() {
        assert_eq!(SheetSelection::parse(""), SheetSelection::First);
        assert_eq!(SheetSelection::parse("2"), SheetSelection::Index(2));
        assert_eq!(
            SheetSelection::parse("Sheet1"),
            SheetSelection::Name("Sheet1".to_string())
        );
    }
}
