//! Centralized path resolution
//!
//! All file and directory paths are resolved here so the server and the
//! management tool agree on where things live.
//!
//! ## Directory Structure
//!
//! ```text
//! <base>/
//! ├── data/
//! │ ├── config.toml
//! │ └── devices.db
//! └── logs/
//!   └── netregistry_*.log
//! ```
//!
//! `<base>` is `--data-dir` when given, otherwise the platform data directory:
//! - **macOS**: `~/Library/Application Support/NetRegistry/`
//! - **Windows**: `%LOCALAPPDATA%\NetRegistry\`
//! - **Linux**: `$XDG_DATA_HOME/NetRegistry/` (fallback `~/.local/share/NetRegistry/`)

use once_cell::sync::Lazy;
use std::path::PathBuf;

const APP_DIR: &str = "NetRegistry";

static BASE_DIRECTORY: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
    if let Some(dir) = crate::arguments::get_data_dir_override() {
        return PathBuf::from(dir);
    }

    if let Some(dir) = dirs::data_local_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(dir) = dirs::data_dir() {
        return dir.join(APP_DIR);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(APP_DIR);
    }

    PathBuf::from(APP_DIR)
}

// =============================================================================
// DIRECTORY ACCESSORS
// =============================================================================

pub fn get_base_directory() -> PathBuf {
    BASE_DIRECTORY.clone()
}

/// Databases and the config file
pub fn get_data_directory() -> PathBuf {
    BASE_DIRECTORY.join("data")
}

/// Daily log files
pub fn get_logs_directory() -> PathBuf {
    BASE_DIRECTORY.join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

pub fn get_config_path() -> PathBuf {
    get_data_directory().join("config.toml")
}

pub fn get_devices_db_path() -> PathBuf {
    get_data_directory().join("devices.db")
}

/// Create every directory the application writes to
///
/// Must run before `logger::init()` since the log file lives in `logs/`.
pub fn ensure_all_directories() -> Result<(), String> {
    for dir in [get_data_directory(), get_logs_directory()] {
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;
    }
    Ok(())
}
