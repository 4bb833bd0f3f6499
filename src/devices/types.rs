//! Device data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub ip_address: String,
    pub mac_address: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// The three user-editable fields of a device
///
/// Used for create, update and import rows. Also the sticky form state when a
/// submission is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInput {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub mac_address: String,
    #[serde(default)]
    pub name: String,
}

impl DeviceInput {
    pub fn new(ip_address: &str, mac_address: &str, name: &str) -> Self {
        Self {
            ip_address: ip_address.to_string(),
            mac_address: mac_address.to_string(),
            name: name.to_string(),
        }
    }

    /// Copy with surrounding whitespace removed from every field
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.ip_address.trim(),
            self.mac_address.trim(),
            self.name.trim(),
        )
    }
}

impl From<&Device> for DeviceInput {
    fn from(device: &Device) -> Self {
        Self::new(&device.ip_address, &device.mac_address, &device.name)
    }
}

/// Result ordering for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    /// Registration order (oldest first)
    #[default]
    Insertion,
    /// Most recently created first
    Newest,
}

/// Search parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceQuery {
    /// Case-insensitive substring tested against ip, mac and name
    pub filter: Option<String>,
    pub order: ListOrder,
}

impl DeviceQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matching(filter: &str) -> Self {
        Self {
            filter: Some(filter.to_string()),
            order: ListOrder::Insertion,
        }
    }

    pub fn newest_first() -> Self {
        Self {
            filter: None,
            order: ListOrder::Newest,
        }
    }

    /// Filter text with blank values treated as "no filter"
    pub fn effective_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}
