/// Centralized command-line argument handling
///
/// All flag checks go through the `CMD_ARGS` store so tests and the
/// management tool can substitute their own argument list.
///
/// Features:
/// - Thread-safe global argument storage
/// - Flag/value lookups (`has_arg`, `get_arg_value`)
/// - Typed accessors for the server overrides (--host, --port, --config, --db, --data-dir)
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Gets the value following a flag (`--port 8080`) or attached to it (`--port=8080`)
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    let prefix = format!("{}=", flag);
    for (i, arg) in args.iter().enumerate() {
        if arg == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

// =============================================================================
// SERVER OVERRIDES
// =============================================================================

/// --host override for the webserver bind address
pub fn get_host_override() -> Option<String> {
    get_arg_value("--host")
}

/// --port override; ignored if it is not a valid port number
pub fn get_port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|p| p.parse().ok())
}

/// --config override for the configuration file path
pub fn get_config_path_override() -> Option<String> {
    get_arg_value("--config")
}

/// --db override for the devices database path
pub fn get_db_path_override() -> Option<String> {
    get_arg_value("--db")
}

/// --data-dir override for the base directory
pub fn get_data_dir_override() -> Option<String> {
    get_arg_value("--data-dir")
}

// =============================================================================
// DEBUG FLAGS
// =============================================================================

pub fn is_debug_database_enabled() -> bool {
    has_arg("--debug-database") || has_arg("--debug-all")
}

pub fn is_debug_import_enabled() -> bool {
    has_arg("--debug-import") || has_arg("--debug-all")
}

pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver") || has_arg("--debug-all")
}

pub fn is_verbose_enabled() -> bool {
    has_arg("--verbose")
}

pub mod patterns {
    use super::has_arg;

    pub fn is_help_requested() -> bool {
        has_arg("--help") || has_arg("-h")
    }
}

/// Print usage for the server binary
pub fn print_help() {
    println!("netregistry - IP/MAC device registry");
    println!();
    println!("USAGE:");
    println!("    netregistry [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --host <HOST>        Bind address (overrides webserver.host)");
    println!("    --port <PORT>        Bind port (overrides webserver.port)");
    println!("    --config <PATH>      Configuration file (default: <data-dir>/data/config.toml)");
    println!("    --db <PATH>          Devices database (overrides database.path)");
    println!("    --data-dir <DIR>     Base directory for data and logs");
    println!("    --quiet              Only log errors");
    println!("    --verbose            Log everything");
    println!("    --debug-<tag>        Debug output for one tag, or --debug-all");
    println!("    -h, --help           Print this help");
    println!();
    println!("TAGS: {}", crate::logger::LogTag::all().join(", "));
}

/// Log which debug modes are active
pub fn print_debug_info() {
    use crate::logger::{self, LogTag};

    let active: Vec<&str> = [
        ("database", is_debug_database_enabled()),
        ("import", is_debug_import_enabled()),
        ("webserver", is_debug_webserver_enabled()),
        ("verbose", is_verbose_enabled()),
    ]
    .iter()
    .filter(|(_, on)| *on)
    .map(|(name, _)| *name)
    .collect();

    if !active.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug modes enabled: {}", active.join(", ")),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test: CMD_ARGS is process-global and tests run in parallel.
    #[test]
    fn test_argument_lookup() {
        set_cmd_args(vec![
            "netregistry".to_string(),
            "--debug-import".to_string(),
            "--port".to_string(),
            "9090".to_string(),
            "--db=/tmp/devices.db".to_string(),
            "--host".to_string(),
        ]);

        assert!(has_arg("--debug-import"));
        assert!(!has_arg("--debug-webserver"));
        assert!(is_debug_import_enabled());
        assert!(!is_debug_database_enabled());
        assert_eq!(get_port_override(), Some(9090));
        assert_eq!(get_db_path_override(), Some("/tmp/devices.db".to_string()));
        // Trailing flag without a value
        assert_eq!(get_host_override(), None);
        assert_eq!(get_config_path_override(), None);

        set_cmd_args(vec!["netregistry".to_string(), "--port".to_string(), "http".to_string()]);
        assert_eq!(get_port_override(), None);
    }
}
