//! Tabular input: spreadsheet rows as records.
//!
//! Spreadsheet decoding is delegated to calamine; this module turns the
//! first row into column headers and every following non-blank row into a
//! [`Record`] keyed by those headers.

mod loader;
mod options;
mod record;

pub use loader::{load_records, load_records_with_options, Table, TableLoader};
pub use options::{LoadOptions, SheetSelection};
pub use record::{is_blank_text, split_items, CellValue, Record};
