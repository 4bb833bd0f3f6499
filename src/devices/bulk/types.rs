//! Bulk import types
//!
//! Data structures for CSV device import.

use serde::Serialize;

// =============================================================================
// PARSED DATA
// =============================================================================

/// Headers and raw rows of a delimited file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Delimiter that produced this parse
    pub delimiter: u8,
}

// =============================================================================
// COLUMN MAPPING
// =============================================================================

/// Header positions of the three logical columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub ip_col: Option<usize>,
    pub mac_col: Option<usize>,
    pub name_col: Option<usize>,
}

impl ColumnMapping {
    /// Check if required columns are mapped
    pub fn is_valid(&self) -> bool {
        self.ip_col.is_some() && self.mac_col.is_some() && self.name_col.is_some()
    }

    /// Get list of missing required columns
    pub fn missing_columns(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ip_col.is_none() {
            missing.push("ip");
        }
        if self.mac_col.is_none() {
            missing.push("mac");
        }
        if self.name_col.is_none() {
            missing.push("name");
        }
        missing
    }
}

// =============================================================================
// IMPORT RESULTS
// =============================================================================

/// What happened to one data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Inserted { id: i64 },
    /// Failed validation or had an empty name
    Invalid { reason: String },
    /// IP or MAC already registered
    Duplicate { reason: String },
}

/// Result of importing a single row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowResult {
    /// Row number in the source file (header is row 1)
    pub row_num: usize,
    pub ip_address: String,
    pub mac_address: String,
    pub name: String,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

/// Result of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Data rows seen (header excluded)
    pub total_rows: usize,
    pub inserted: usize,
    pub skipped_invalid: usize,
    pub skipped_duplicates: usize,
    pub rows: Vec<ImportRowResult>,
}

impl ImportReport {
    pub(super) fn record(&mut self, row: ImportRowResult) {
        self.total_rows += 1;
        match row.outcome {
            RowOutcome::Inserted { .. } => self.inserted += 1,
            RowOutcome::Invalid { .. } => self.skipped_invalid += 1,
            RowOutcome::Duplicate { .. } => self.skipped_duplicates += 1,
        }
        self.rows.push(row);
    }

    /// One-line summary for logs and flash messages
    pub fn summary(&self) -> String {
        format!(
            "{} of {} row(s) imported ({} invalid, {} duplicate)",
            self.inserted, self.total_rows, self.skipped_invalid, self.skipped_duplicates
        )
    }
}
