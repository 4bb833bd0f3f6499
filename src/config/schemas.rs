/// Configuration schemas - every config section defined once with its defaults
///
/// The TOML file mirrors this layout:
///
/// ```toml
/// [webserver]
/// host = "127.0.0.1"
/// port = 8080
///
/// [database]
/// path = ""            # empty = <data-dir>/data/devices.db
///
/// [import]
/// fetch_timeout_secs = 15
///
/// [validation]
/// mac_policy = "strict"
/// ```
use crate::config_struct;
use crate::devices::MacPolicy;

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    /// Webserver bind address and request limits
    pub struct WebserverConfig {
        /// Host/IP address to bind (0.0.0.0 = all interfaces)
        host: String = "127.0.0.1".to_string(),

        /// Port to bind
        port: u16 = 8080,

        /// Maximum accepted request body (uploads included)
        max_upload_bytes: usize = 5 * 1024 * 1024,
    }
}

// ============================================================================
// DATABASE CONFIGURATION
// ============================================================================

config_struct! {
    /// Devices database settings
    pub struct DatabaseConfig {
        /// Database file; empty means the default location in the data directory
        path: String = String::new(),

        /// How long a writer waits on a locked database before failing
        busy_timeout_ms: u64 = 5_000,

        /// Use write-ahead logging for file databases
        wal: bool = true,
    }
}

// ============================================================================
// IMPORT CONFIGURATION
// ============================================================================

config_struct! {
    /// CSV bulk import settings
    pub struct ImportConfig {
        /// Timeout for fetching a CSV from a URL
        fetch_timeout_secs: u64 = 15,

        /// Maximum size of a fetched CSV
        max_fetch_bytes: usize = 5 * 1024 * 1024,

        /// Delimiter retried when the comma parse fails
        fallback_delimiter: String = ";".to_string(),
    }
}

// ============================================================================
// VALIDATION CONFIGURATION
// ============================================================================

config_struct! {
    /// Input validation policy
    pub struct ValidationConfig {
        /// MAC address policy: "strict" (hex groups) or "loose" (group count only)
        mac_policy: MacPolicy = MacPolicy::Strict,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sections
    pub struct Config {
        webserver: WebserverConfig = WebserverConfig::default(),
        database: DatabaseConfig = DatabaseConfig::default(),
        import: ImportConfig = ImportConfig::default(),
        validation: ValidationConfig = ValidationConfig::default(),
    }
}

impl ImportConfig {
    /// Fallback delimiter as a byte; falls back to ';' if misconfigured
    pub fn fallback_delimiter_byte(&self) -> u8 {
        match self.fallback_delimiter.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => b';',
        }
    }
}
