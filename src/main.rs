use std::path::PathBuf;
use std::sync::Arc;

use netregistry::{
    arguments::{
        get_config_path_override, get_db_path_override, get_host_override, get_port_override,
        patterns, print_debug_info, print_help,
    },
    config::{self, Config},
    devices::{DeviceGateway, DeviceStore},
    logger::{self as logger, LogTag},
    paths, webserver,
};

/// Main entry point for NetRegistry
///
/// Loads the configuration, opens the device store and serves the registry
/// page and JSON API until Ctrl+C.
#[tokio::main]
async fn main() {
    // Logger needs the logs directory to create its file
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if patterns::is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "NetRegistry starting up...");
    print_debug_info();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &e);
            1
        }
    };

    logger::flush();
    std::process::exit(exit_code);
}

async fn run() -> Result<(), String> {
    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    let config_path = get_config_path_override()
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_config_path);
    config::load_config_from_path(&config_path)?;
    logger::info(
        LogTag::Config,
        &format!("Configuration loaded from {}", config_path.display()),
    );

    let mut config: Config = config::get_config_clone();
    if let Some(host) = get_host_override() {
        config.webserver.host = host;
    }
    if let Some(port) = get_port_override() {
        config.webserver.port = port;
    }

    // =========================================================================
    // STORAGE
    // =========================================================================

    let db_path = get_db_path_override()
        .or_else(|| {
            let configured = config.database.path.trim();
            (!configured.is_empty()).then(|| configured.to_string())
        })
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_devices_db_path);

    let store = DeviceStore::open(&db_path, &config.database).map_err(|e| e.to_string())?;
    let count = store.count().map_err(|e| e.to_string())?;
    logger::info(
        LogTag::Database,
        &format!(
            "{} device(s) registered, MAC policy: {}",
            count,
            config.validation.mac_policy.as_str()
        ),
    );

    // =========================================================================
    // WEBSERVER
    // =========================================================================

    if let Err(e) = ctrlc::set_handler(|| {
        logger::info(LogTag::System, "Ctrl+C received, shutting down...");
        webserver::shutdown();
    }) {
        logger::warning(
            LogTag::System,
            &format!("Failed to install Ctrl+C handler: {}", e),
        );
    }

    let host = config.webserver.host.clone();
    let port = config.webserver.port;
    let state = Arc::new(webserver::AppState::new(Arc::new(store), config));

    webserver::start_server(state, &host, port).await?;

    logger::info(LogTag::System, "NetRegistry stopped");
    Ok(())
}
