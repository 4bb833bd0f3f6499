/// Configuration utilities - loading, saving and access helpers
///
/// The configuration is loaded once at startup into a global and read through
/// `with_config` / `get_config_clone`.
use super::schemas::Config;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Parse a TOML document; missing sections and fields take their defaults
pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Load configuration from a file and initialize the global CONFIG
///
/// A missing file is not an error: defaults are used and written to `path`
/// so they can be edited later.
pub fn load_config_from_path(path: &Path) -> Result<(), String> {
    let config = if path.exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
        parse_config(&contents)
            .map_err(|e| format!("{} ('{}')", e, path.display()))?
    } else {
        let config = Config::default();
        write_config(path, &config)?;
        config
    };

    CONFIG
        .set(RwLock::new(config))
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(())
}

/// Execute a function with read access to the configuration
///
/// Falls back to defaults when the config was never loaded (tests, tools).
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    match CONFIG.get() {
        Some(lock) => match lock.read() {
            Ok(config) => f(&config),
            Err(poisoned) => f(&poisoned.into_inner()),
        },
        None => f(&Config::default()),
    }
}

/// Get a clone of the entire configuration
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Serialize a configuration to disk
pub fn write_config(path: &Path, config: &Config) -> Result<(), String> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    std::fs::write(path, contents)
        .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::MacPolicy;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [webserver]
            port = 9000

            [validation]
            mac_policy = "loose"
            "#,
        )
        .unwrap();

        assert_eq!(config.webserver.port, 9000);
        assert_eq!(config.webserver.host, "127.0.0.1");
        assert_eq!(config.validation.mac_policy, MacPolicy::Loose);
        assert_eq!(config.import.fallback_delimiter_byte(), b';');
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = parse_config("[validation]\nmac_policy = \"whatever\"").unwrap_err();
        assert!(err.contains("Failed to parse config"));
    }

    #[test]
    fn test_write_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.database.busy_timeout_ms = 250;

        write_config(&path, &config).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_config(&contents).unwrap(), config);
    }
}
