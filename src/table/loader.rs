//! Spreadsheet loading backed by calamine.

use super::{CellValue, LoadOptions, Record, SheetSelection};
use crate::detect::detect_format_from_path;
use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Records loaded from one worksheet.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Name of the worksheet the records came from
    pub sheet_name: String,

    /// All worksheet names in the workbook
    pub sheet_names: Vec<String>,

    /// Column headers in sheet order
    pub columns: Vec<String>,

    /// Records in row order
    pub records: Vec<Record>,
}

impl Table {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if the table has a column.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Reads the first (or selected) worksheet of a workbook into records.
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    options: LoadOptions,
}

impl TableLoader {
    /// Create a loader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom options.
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Load a workbook from a file path.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Table> {
        let path = path.as_ref();
        let format = detect_format_from_path(path)?;
        log::info!("Reading: {} ({})", path.display(), format);

        let mut workbook = open_workbook_auto(path)?;
        let sheet_names = workbook.sheet_names();
        let sheet_name = self.resolve_sheet(&sheet_names)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let (columns, records) = self.read_range(&range);
        log::info!(
            "Loaded {} records with {} columns from sheet '{}'",
            records.len(),
            columns.len(),
            sheet_name
        );

        Ok(Table {
            sheet_name,
            sheet_names,
            columns,
            records,
        })
    }

    fn resolve_sheet(&self, names: &[String]) -> Result<String> {
        if names.is_empty() {
            return Err(Error::EmptyWorkbook);
        }
        match &self.options.sheet {
            SheetSelection::First => Ok(names[0].clone()),
            SheetSelection::Index(index) => names
                .get(*index)
                .cloned()
                .ok_or_else(|| Error::SheetNotFound(format!("#{}", index))),
            SheetSelection::Name(name) => names
                .iter()
                .find(|n| *n == name)
                .cloned()
                .ok_or_else(|| Error::SheetNotFound(name.clone())),
        }
    }

    fn read_range(&self, range: &Range<Data>) -> (Vec<String>, Vec<Record>) {
        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => self.header_names(header),
            None => return (Vec::new(), Vec::new()),
        };

        let mut records = Vec::new();
        for (index, row) in rows.enumerate() {
            let values: Vec<CellValue> = row.iter().map(cell_value).collect();
            if values.iter().all(CellValue::is_blank) {
                log::debug!("Skipping blank row {}", index + 1);
                continue;
            }
            let fields = columns
                .iter()
                .cloned()
                .zip(values.into_iter().chain(std::iter::repeat(CellValue::Empty)));
            records.push(Record::new(index + 1, fields));
        }

        (columns, records)
    }

    /// Header names; blank cells become `Unnamed: N`, repeats get a `.N` suffix.
    fn header_names(&self, header: &[Data]) -> Vec<String> {
        let mut seen: HashMap<String, usize> = HashMap::new();
        header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let mut name = cell_value(cell).as_text();
                if self.options.trim_headers {
                    name = name.trim().to_string();
                }
                if name.is_empty() {
                    log::warn!("Blank header in column {}", i + 1);
                    name = format!("Unnamed: {}", i);
                }
                let count = seen.entry(name.clone()).or_insert(0);
                let unique = if *count == 0 {
                    name.clone()
                } else {
                    log::warn!("Duplicate header '{}' in column {}", name, i + 1);
                    format!("{}.{}", name, count)
                };
                *count += 1;
                unique
            })
            .collect()
    }
}

/// Convert a spreadsheet cell into a record value.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Empty => CellValue::Empty,
        Data::Error(e) => {
            log::debug!("Cell error {:?} read as blank", e);
            CellValue::Empty
        }
        other => CellValue::Text(other.to_string()),
    }
}

/// Load records from the first worksheet of a spreadsheet.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    Ok(TableLoader::new().load(path)?.records)
}

/// Load records with custom options.
pub fn load_records_with_options<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<Vec<Record>> {
    Ok(TableLoader::with_options(options.clone()).load(path)?.records)
}
