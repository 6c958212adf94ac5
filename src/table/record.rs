//! Record and cell-value types.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Text content
    Text(String),
    /// Numeric content; NaN stands in for a blank cell
    Number(f64),
    /// Boolean content
    Bool(bool),
    /// Empty cell
    Empty,
}

impl CellValue {
    /// Check whether the cell counts as blank.
    ///
    /// Whitespace-only text, NaN numbers and empty cells are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => is_blank_text(s),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Bool(_) => false,
            CellValue::Empty => true,
        }
    }

    /// Display text of the cell. Blank cells yield an empty string.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.is_nan() => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// Check whether a string is empty or whitespace-only.
pub fn is_blank_text(text: &str) -> bool {
    text.trim().is_empty()
}

/// Integral numbers are written without a fractional part ("12", not "12.0").
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One row of the source table.
///
/// Fields are keyed by column header. Records are immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    /// 1-indexed data row (the header row is not counted)
    pub row: usize,

    fields: BTreeMap<String, CellValue>,
}

impl Record {
    /// Create a record from `(column, value)` pairs.
    pub fn new<I, K, V>(row: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        Self {
            row,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get a raw cell by column header.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Check if the record has a column.
    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    /// Column headers of this record, in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// Text of a required field.
    ///
    /// A missing column is an error; a blank cell yields an empty string.
    pub fn text(&self, column: &str) -> Result<String> {
        self.get(column)
            .map(CellValue::as_text)
            .ok_or_else(|| Error::MissingColumn {
                row: self.row,
                column: column.to_string(),
            })
    }

    /// Text of an optional field, or `None` when absent or blank.
    pub fn optional(&self, column: &str) -> Option<String> {
        self.get(column)
            .filter(|cell| !cell.is_blank())
            .map(CellValue::as_text)
    }

    /// Check whether a field is absent or blank.
    pub fn is_blank(&self, column: &str) -> bool {
        self.get(column).map_or(true, CellValue::is_blank)
    }

    /// Newline-delimited items of a field with blank items dropped.
    ///
    /// Absent or blank fields yield an empty list.
    pub fn items(&self, column: &str) -> Vec<String> {
        match self.optional(column) {
            Some(text) => split_items(&text),
            None => Vec::new(),
        }
    }
}

/// Split a multi-valued cell into its non-blank lines.
pub fn split_items(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|item| item.strip_suffix('\r').unwrap_or(item))
        .filter(|item| !is_blank_text(item))
        .map(str::to_string)
        .collect()
}
