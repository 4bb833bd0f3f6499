//! CSV parsing for bulk import
//!
//! Handles delimiter fallback and column detection.

use super::types::{ColumnMapping, ParsedTable};
use crate::devices::normalize;
use crate::errors::{RegistryError, RegistryResult};
use crate::logger::{self, LogTag};

// =============================================================================
// CSV PARSING
// =============================================================================

/// Parse delimited text, trying ',' first and then `fallback` once
///
/// A comma parse counts as failed when the reader errors or when the whole
/// header lands in one column that still contains the fallback delimiter.
pub fn parse_table(content: &str, fallback: u8) -> RegistryResult<ParsedTable> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let first_error = match parse_with_delimiter(content, b',') {
        Ok(table) if !collapsed_header(&table, fallback) => return Ok(table),
        Ok(_) => format!(
            "header is a single column containing '{}'",
            fallback as char
        ),
        Err(e) => e,
    };

    logger::debug(
        LogTag::Import,
        &format!(
            "Comma parse rejected ({}), retrying with '{}'",
            first_error, fallback as char
        ),
    );

    match parse_with_delimiter(content, fallback) {
        Ok(table) => Ok(table),
        Err(e) => Err(RegistryError::Parse(e)),
    }
}

/// Parse with a single delimiter into headers and rows
fn parse_with_delimiter(content: &str, delimiter: u8) -> Result<ParsedTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("Failed to parse CSV headers: {}", e))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err("CSV file has no headers".to_string());
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| format!("Failed to parse CSV row {}: {}", idx + 2, e))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(ParsedTable {
        headers,
        rows,
        delimiter,
    })
}

fn collapsed_header(table: &ParsedTable, fallback: u8) -> bool {
    table.headers.len() == 1 && table.headers[0].contains(fallback as char)
}

// =============================================================================
// COLUMN DETECTION
// =============================================================================

/// Accepted header names per logical column, already normalized
const IP_PATTERNS: &[&str] = &["ip", "ip_address"];
const MAC_PATTERNS: &[&str] = &["mac", "mac_address"];
const NAME_PATTERNS: &[&str] = &["name", "nome", "device", "dispositivo"];

/// Map headers to the ip, mac and name columns
///
/// Headers are normalized and compared exactly. The first matching header
/// wins for each column.
pub fn detect_columns(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for (idx, header) in headers.iter().enumerate() {
        let normalized = normalize(header);

        if mapping.ip_col.is_none() && IP_PATTERNS.contains(&normalized.as_str()) {
            mapping.ip_col = Some(idx);
        } else if mapping.mac_col.is_none() && MAC_PATTERNS.contains(&normalized.as_str()) {
            mapping.mac_col = Some(idx);
        } else if mapping.name_col.is_none() && NAME_PATTERNS.contains(&normalized.as_str()) {
            mapping.name_col = Some(idx);
        }
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_comma() {
        let table = parse_table("ip,mac,name\n10.0.0.1, 00:00:00:00:00:01 ,a\n", b';').unwrap();
        assert_eq!(table.delimiter, b',');
        assert_eq!(table.headers, headers(&["ip", "mac", "name"]));
        assert_eq!(table.rows, vec![headers(&["10.0.0.1", "00:00:00:00:00:01", "a"])]);
    }

    #[test]
    fn test_parse_semicolon_fallback() {
        let table = parse_table("IP;MAC;Nome\n10.0.0.1;00:00:00:00:00:01;a\n", b';').unwrap();
        assert_eq!(table.delimiter, b';');
        assert_eq!(table.headers, headers(&["IP", "MAC", "Nome"]));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_parse_strips_bom() {
        let table = parse_table("\u{feff}ip,mac,name\n", b';').unwrap();
        assert_eq!(table.headers[0], "ip");
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_parse_empty_input_fails() {
        let err = parse_table("", b';').unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[test]
    fn test_detect_columns_with_accents_and_synonyms() {
        let mapping = detect_columns(&headers(&[" Dispositivo ", "MAC_Address", "IP"]));
        assert_eq!(mapping.ip_col, Some(2));
        assert_eq!(mapping.mac_col, Some(1));
        assert_eq!(mapping.name_col, Some(0));
        assert!(mapping.is_valid());
    }

    #[test]
    fn test_detect_columns_exact_match_only() {
        let mapping = detect_columns(&headers(&["Endereco_IP", "MAC", "Nome"]));
        assert_eq!(mapping.ip_col, None);
        assert_eq!(mapping.missing_columns(), vec!["ip"]);
    }
}
