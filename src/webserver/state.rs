/// Shared application state for the webserver
///
/// Holds the device store handle and the configuration snapshot taken at
/// startup.
use crate::config::Config;
use crate::devices::{DeviceGateway, MacPolicy};
use std::sync::Arc;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    /// Device persistence
    pub store: Arc<dyn DeviceGateway>,

    /// Configuration in effect
    pub config: Arc<Config>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn DeviceGateway>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            startup_time: chrono::Utc::now(),
        }
    }

    pub fn mac_policy(&self) -> MacPolicy {
        self.config.validation.mac_policy
    }

    pub fn fallback_delimiter(&self) -> u8 {
        self.config.import.fallback_delimiter_byte()
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time)
            .num_seconds()
            .max(0) as u64
    }
}
