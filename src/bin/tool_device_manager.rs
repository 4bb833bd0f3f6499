use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::path::PathBuf;

use netregistry::config::{self, Config};
use netregistry::devices::bulk::{export_csv, fetch_csv, import_bytes, RowOutcome};
use netregistry::devices::{
    register_device, remove_device, remove_device_by_ip, search_devices, DeviceInput,
    DeviceQuery, DeviceStore, ListOrder,
};
use netregistry::logger::{self, ConsoleTarget, LoggerConfig};
use netregistry::paths;

fn cli() -> Command {
    Command::new("Device Manager")
        .version(env!("CARGO_PKG_VERSION"))
        .about("NetRegistry device management tool")
        .subcommand_required(true)
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .global(true)
                .help("Devices database (default: configured path or data directory)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Config file (default: <data-dir>/data/config.toml)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .global(true)
                .help("Base directory for data and logs"),
        )
        .subcommand(
            Command::new("list")
                .about("List registered devices")
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .value_name("TEXT")
                        .help("Case-insensitive match on IP, MAC or name"),
                )
                .arg(
                    Arg::new("newest")
                        .long("newest")
                        .action(ArgAction::SetTrue)
                        .help("Most recently registered first"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Register a device")
                .arg(Arg::new("ip").value_name("IP").required(true))
                .arg(Arg::new("mac").value_name("MAC").required(true))
                .arg(Arg::new("name").value_name("NAME").required(true)),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a device by id or IP")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_name("ID")
                        .value_parser(clap::value_parser!(i64))
                        .conflicts_with("ip"),
                )
                .arg(Arg::new("ip").long("ip").value_name("IP")),
        )
        .subcommand(
            Command::new("import")
                .about("Import devices from a CSV file or http(s) URL")
                .arg(
                    Arg::new("source")
                        .value_name("FILE_OR_URL")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export devices as CSV")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write to a file instead of stdout"),
                ),
        )
}

/// Config from `--config` or the default location; defaults when absent
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_config_path);

    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    config::parse_config(&contents).map_err(anyhow::Error::msg)
}

fn open_store(matches: &ArgMatches, config: &Config) -> Result<DeviceStore> {
    let path = matches
        .get_one::<String>("db")
        .cloned()
        .or_else(|| {
            let configured = config.database.path.trim();
            (!configured.is_empty()).then(|| configured.to_string())
        })
        .map(PathBuf::from)
        .unwrap_or_else(paths::get_devices_db_path);

    DeviceStore::open(&path, &config.database)
        .with_context(|| format!("Failed to open {}", path.display()))
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(|s| s.as_str())
        .unwrap_or("")
}

fn list_devices(store: &DeviceStore, matches: &ArgMatches) -> Result<()> {
    let query = DeviceQuery {
        filter: matches.get_one::<String>("filter").cloned(),
        order: if matches.get_flag("newest") {
            ListOrder::Newest
        } else {
            ListOrder::Insertion
        },
    };
    let devices = search_devices(store, &query)?;

    if devices.is_empty() {
        println!("{}", "No devices found".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["ID", "IP", "MAC", "Name", "Registered"]);

    for device in &devices {
        table.add_row([
            device.id.to_string(),
            device.ip_address.clone(),
            device.mac_address.clone(),
            device.name.clone(),
            device.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{}", table);
    println!("{} device(s)", devices.len());
    Ok(())
}

fn add_device(store: &DeviceStore, config: &Config, matches: &ArgMatches) -> Result<()> {
    let input = DeviceInput::new(
        value(matches, "ip"),
        value(matches, "mac"),
        value(matches, "name"),
    );

    let device = register_device(store, &input, config.validation.mac_policy)?;
    println!(
        "{} {} ({}, {}) registered with id {}",
        "✓".green(),
        device.name.bold(),
        device.ip_address,
        device.mac_address,
        device.id
    );
    Ok(())
}

fn delete_device(store: &DeviceStore, matches: &ArgMatches) -> Result<()> {
    let removed = if let Some(id) = matches.get_one::<i64>("id") {
        remove_device(store, *id)?
    } else if let Some(ip) = matches.get_one::<String>("ip") {
        remove_device_by_ip(store, ip)?
    } else {
        bail!("Specify --id <ID> or --ip <IP>");
    };

    if removed {
        println!("{} Device removed", "✓".green());
    } else {
        println!("{}", "Nothing to remove".yellow());
    }
    Ok(())
}

async fn import_devices(store: &DeviceStore, config: &Config, matches: &ArgMatches) -> Result<()> {
    let source = value(matches, "source");

    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_csv(source, &config.import).await?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {}", source))?
    };

    let report = import_bytes(
        store,
        &bytes,
        config.validation.mac_policy,
        config.import.fallback_delimiter_byte(),
    )?;

    for row in &report.rows {
        match &row.outcome {
            RowOutcome::Inserted { .. } => {}
            RowOutcome::Invalid { reason } => {
                println!("{} row {}: {}", "invalid".red(), row.row_num, reason)
            }
            RowOutcome::Duplicate { reason } => {
                println!("{} row {}: {}", "duplicate".yellow(), row.row_num, reason)
            }
        }
    }

    println!("{} {}", "✓".green(), report.summary());
    Ok(())
}

fn export_devices(store: &DeviceStore, matches: &ArgMatches) -> Result<()> {
    let devices = search_devices(store, &DeviceQuery::all())?;
    let csv = export_csv(&devices)?;

    match matches.get_one::<String>("output") {
        Some(path) => {
            std::fs::write(path, csv).with_context(|| format!("Failed to write {}", path))?;
            eprintln!("{} {} device(s) exported to {}", "✓".green(), devices.len(), path);
        }
        None => print!("{}", csv),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output such as `export`
    logger::set_logger_config(LoggerConfig {
        console: ConsoleTarget::Stderr,
        ..logger::get_logger_config()
    });

    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    let store = open_store(&matches, &config)?;

    match matches.subcommand() {
        Some(("list", sub)) => list_devices(&store, sub),
        Some(("add", sub)) => add_device(&store, &config, sub),
        Some(("delete", sub)) => delete_device(&store, sub),
        Some(("import", sub)) => import_devices(&store, &config, sub).await,
        Some(("export", sub)) => export_devices(&store, sub),
        _ => bail!("Unknown command, see --help"),
    }
}
