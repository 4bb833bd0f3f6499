//! Device operations used by the web handlers and the management tool
//!
//! Each function validates, calls the gateway, and logs the outcome.

use super::database::DeviceGateway;
use super::types::{Device, DeviceInput, DeviceQuery};
use super::validator::{validate_device, MacPolicy};
use crate::errors::{RegistryError, RegistryResult};
use crate::logger::{self, LogTag};

/// Validate and insert a new device
pub fn register_device(
    gateway: &dyn DeviceGateway,
    input: &DeviceInput,
    policy: MacPolicy,
) -> RegistryResult<Device> {
    let clean = validate_device(input, policy).map_err(|e| {
        logger::debug(LogTag::Devices, &format!("Registration rejected: {}", e));
        e
    })?;

    let id = gateway.create(&clean).map_err(|e| {
        logger::warning(LogTag::Devices, &format!("Registration failed: {}", e));
        e
    })?;

    logger::info(
        LogTag::Devices,
        &format!(
            "Device registered: id={} ip={} mac={} name={}",
            id, clean.ip_address, clean.mac_address, clean.name
        ),
    );

    fetch_device(gateway, id)
}

/// Validate and apply an edit to an existing device
pub fn edit_device(
    gateway: &dyn DeviceGateway,
    id: i64,
    input: &DeviceInput,
    policy: MacPolicy,
) -> RegistryResult<Device> {
    let clean = validate_device(input, policy)?;

    gateway.update(id, &clean).map_err(|e| {
        logger::warning(LogTag::Devices, &format!("Update of device {} failed: {}", id, e));
        e
    })?;

    logger::info(
        LogTag::Devices,
        &format!(
            "Device updated: id={} ip={} mac={} name={}",
            id, clean.ip_address, clean.mac_address, clean.name
        ),
    );

    fetch_device(gateway, id)
}

/// Delete by id; returns whether a row was removed
pub fn remove_device(gateway: &dyn DeviceGateway, id: i64) -> RegistryResult<bool> {
    let removed = gateway.delete_by_id(id)?;
    if removed {
        logger::info(LogTag::Devices, &format!("Device {} deleted", id));
    } else {
        logger::debug(LogTag::Devices, &format!("Delete of device {}: nothing to remove", id));
    }
    Ok(removed)
}

/// Delete by IP; returns whether a row was removed
pub fn remove_device_by_ip(gateway: &dyn DeviceGateway, ip: &str) -> RegistryResult<bool> {
    let ip = ip.trim();
    let removed = gateway.delete_by_ip(ip)?;
    if removed {
        logger::info(LogTag::Devices, &format!("Device with IP {} deleted", ip));
    } else {
        logger::debug(LogTag::Devices, &format!("Delete of IP {}: nothing to remove", ip));
    }
    Ok(removed)
}

pub fn search_devices(
    gateway: &dyn DeviceGateway,
    query: &DeviceQuery,
) -> RegistryResult<Vec<Device>> {
    let devices = gateway.list(query)?;
    logger::verbose(
        LogTag::Devices,
        &format!(
            "Search filter={:?} order={:?} returned {} device(s)",
            query.effective_filter(),
            query.order,
            devices.len()
        ),
    );
    Ok(devices)
}

/// Look up a device, mapping absence to `NotFound`
pub fn fetch_device(gateway: &dyn DeviceGateway, id: i64) -> RegistryResult<Device> {
    gateway.get(id)?.ok_or(RegistryError::NotFound { id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceStore;
    use crate::errors::ValidationError;

    #[test]
    fn test_register_then_search() {
        let store = DeviceStore::open_in_memory().unwrap();
        let device = register_device(
            &store,
            &DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"),
            MacPolicy::Strict,
        )
        .unwrap();
        assert_eq!(device.name, "Printer");

        let found = search_devices(&store, &DeviceQuery::matching("print")).unwrap();
        assert_eq!(found, vec![device]);
    }

    #[test]
    fn test_register_invalid_ip_stores_nothing() {
        let store = DeviceStore::open_in_memory().unwrap();
        let err = register_device(
            &store,
            &DeviceInput::new("192.168.0.256", "AA:BB:CC:DD:EE:FF", "Printer"),
            MacPolicy::Strict,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidIp(_))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_edit_validates_and_reports_missing() {
        let store = DeviceStore::open_in_memory().unwrap();
        let device = register_device(
            &store,
            &DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"),
            MacPolicy::Strict,
        )
        .unwrap();

        let err = edit_device(
            &store,
            device.id,
            &DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE", "Printer"),
            MacPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidMac(_))
        ));

        let err = edit_device(
            &store,
            999,
            &DeviceInput::new("10.0.0.6", "AA:BB:CC:DD:EE:00", "Other"),
            MacPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { id: 999 }));

        let edited = edit_device(
            &store,
            device.id,
            &DeviceInput::new(" 10.0.0.8 ", "AA:BB:CC:DD:EE:FF", "Printer 2"),
            MacPolicy::Strict,
        )
        .unwrap();
        assert_eq!(edited.ip_address, "10.0.0.8");
        assert_eq!(edited.name, "Printer 2");
    }

    #[test]
    fn test_remove_by_ip_trims() {
        let store = DeviceStore::open_in_memory().unwrap();
        register_device(
            &store,
            &DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"),
            MacPolicy::Strict,
        )
        .unwrap();

        assert!(remove_device_by_ip(&store, " 10.0.0.5 ").unwrap());
        assert!(!remove_device_by_ip(&store, "10.0.0.5").unwrap());
        assert!(!remove_device(&store, 1).unwrap());
    }
}
