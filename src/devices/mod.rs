//! Device registry core
//!
//! Validation, header normalization, SQLite persistence and bulk import for
//! network devices identified by IP address, MAC address and name.

pub mod bulk;
mod database;
mod manager;
mod normalize;
mod types;
mod validator;

pub use database::{DeviceGateway, DeviceStore};
pub use manager::{
    edit_device, fetch_device, register_device, remove_device, remove_device_by_ip,
    search_devices,
};
pub use normalize::normalize;
pub use types::{Device, DeviceInput, DeviceQuery, ListOrder};
pub use validator::{is_valid_ip, is_valid_mac, is_valid_mac_loose, validate_device, MacPolicy};
