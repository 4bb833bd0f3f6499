//! Bulk device import and export
//!
//! - `parser`: delimiter-tolerant CSV parsing and header detection
//! - `importer`: per-row validation and insertion with a report
//! - `fetch`: CSV download for URL imports
//! - `export`: CSV output of registered devices

mod export;
mod fetch;
mod importer;
mod parser;
mod types;

pub use export::export_csv;
pub use fetch::fetch_csv;
pub use importer::{import_bytes, import_csv, import_table};
pub use parser::{detect_columns, parse_table};
pub use types::{ColumnMapping, ImportReport, ImportRowResult, ParsedTable, RowOutcome};
