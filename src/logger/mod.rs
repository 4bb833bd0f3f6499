//! Structured logging for netregistry
//!
//! Tagged, leveled logging with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use netregistry::logger::{self, LogTag};
//!
//! logger::info(LogTag::Devices, "Device registered: printer-01");
//! logger::warning(LogTag::Import, "Row 4 skipped: invalid MAC");
//! logger::debug(LogTag::Database, "Opened devices.db"); // Only with --debug-database
//! ```
//!
//! Call `logger::init()` once in main, after the logs directory exists.
//! Before `init()` messages still reach the console, only the file sink is off.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{
    get_logger_config, init_from_args, set_logger_config, ConsoleTarget, LoggerConfig,
};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger system
///
/// Reads debug flags from the command line and opens today's log file.
pub fn init() {
    config::init_from_args();
    file::init_file_logging();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (shown unless --quiet)
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when --debug-<module> is given for the tag, e.g. `--debug-import`.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Flush pending log file writes
///
/// Call during shutdown.
pub fn flush() {
    file::flush_file_logging();
}
