//! CSV export of registered devices
//!
//! The header uses the import column names so an export can be re-imported.

use crate::devices::types::Device;
use crate::errors::{RegistryError, RegistryResult};

const EXPORT_HEADERS: [&str; 4] = ["ip", "mac", "name", "created_at"];

/// Write devices as comma-separated CSV
pub fn export_csv(devices: &[Device]) -> RegistryResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| RegistryError::Storage(format!("Failed to write CSV header: {}", e)))?;

    for device in devices {
        let created_at = device.created_at.to_rfc3339();
        writer
            .write_record([
                device.ip_address.as_str(),
                device.mac_address.as_str(),
                device.name.as_str(),
                created_at.as_str(),
            ])
            .map_err(|e| RegistryError::Storage(format!("Failed to write CSV row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| RegistryError::Storage(format!("Failed to finish CSV: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| RegistryError::Storage(format!("CSV output is not UTF-8: {}", e)))
}
