//! Bulk import execution
//!
//! Rows are validated and inserted one at a time through the gateway.
//! Invalid and duplicate rows are skipped and recorded in the report.

use super::parser::{detect_columns, parse_table};
use super::types::{ImportReport, ImportRowResult, ParsedTable, RowOutcome};
use crate::devices::database::DeviceGateway;
use crate::devices::types::DeviceInput;
use crate::devices::validator::{validate_device, MacPolicy};
use crate::errors::{RegistryError, RegistryResult};
use crate::logger::{self, LogTag};

/// Import raw CSV text
pub fn import_csv(
    gateway: &dyn DeviceGateway,
    content: &str,
    policy: MacPolicy,
    fallback_delimiter: u8,
) -> RegistryResult<ImportReport> {
    let table = parse_table(content, fallback_delimiter)?;
    import_table(gateway, &table, policy)
}

/// Import uploaded or fetched bytes; they must be UTF-8
pub fn import_bytes(
    gateway: &dyn DeviceGateway,
    bytes: &[u8],
    policy: MacPolicy,
    fallback_delimiter: u8,
) -> RegistryResult<ImportReport> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| RegistryError::Parse(format!("file is not valid UTF-8: {}", e)))?;
    import_csv(gateway, content, policy, fallback_delimiter)
}

/// Import an already parsed table
///
/// Fails with `MissingColumns` before touching any row when a column cannot
/// be resolved. Storage failures other than duplicates abort the import;
/// rows inserted before the failure stay inserted.
pub fn import_table(
    gateway: &dyn DeviceGateway,
    table: &ParsedTable,
    policy: MacPolicy,
) -> RegistryResult<ImportReport> {
    let mapping = detect_columns(&table.headers);
    let (ip_col, mac_col, name_col) = match (mapping.ip_col, mapping.mac_col, mapping.name_col) {
        (Some(ip), Some(mac), Some(name)) => (ip, mac, name),
        _ => {
            let missing = mapping.missing_columns();
            logger::warning(
                LogTag::Import,
                &format!(
                    "Import rejected, missing columns: {} (headers: {})",
                    missing.join(", "),
                    table.headers.join(", ")
                ),
            );
            return Err(RegistryError::MissingColumns { missing });
        }
    };

    logger::debug(
        LogTag::Import,
        &format!(
            "Column mapping ip={} mac={} name={} over {} row(s)",
            ip_col,
            mac_col,
            name_col,
            table.rows.len()
        ),
    );

    let mut report = ImportReport::default();

    for (idx, row) in table.rows.iter().enumerate() {
        let row_num = idx + 2;
        let input = DeviceInput::new(
            cell(row, ip_col),
            cell(row, mac_col),
            cell(row, name_col),
        );

        let outcome = match validate_device(&input, policy) {
            Err(e) => {
                logger::debug(LogTag::Import, &format!("Row {} skipped: {}", row_num, e));
                RowOutcome::Invalid {
                    reason: e.to_string(),
                }
            }
            Ok(clean) => match gateway.create(&clean) {
                Ok(id) => RowOutcome::Inserted { id },
                Err(e @ RegistryError::DuplicateKey { .. }) => {
                    logger::debug(LogTag::Import, &format!("Row {} skipped: {}", row_num, e));
                    RowOutcome::Duplicate {
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    logger::error(
                        LogTag::Import,
                        &format!(
                            "Import aborted at row {} after {} insert(s): {}",
                            row_num, report.inserted, e
                        ),
                    );
                    return Err(e);
                }
            },
        };

        let input = input.trimmed();
        report.record(ImportRowResult {
            row_num,
            ip_address: input.ip_address,
            mac_address: input.mac_address,
            name: input.name,
            outcome,
        });
    }

    logger::info(LogTag::Import, &format!("Import finished: {}", report.summary()));
    Ok(report)
}

/// Cell text, empty when the row is short
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_str()).unwrap_or("")
}
