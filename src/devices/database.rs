//! Devices Database Module
//!
//! SQLite persistence for the device registry:
//! - One `devices` table with unique IP and MAC columns
//! - Typed duplicate detection at the gateway boundary
//! - Write operations in IMMEDIATE transactions

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;

use super::types::{Device, DeviceInput, DeviceQuery, ListOrder};
use crate::config::DatabaseConfig;
use crate::errors::{KeyField, RegistryError, RegistryResult};
use crate::logger::{self, LogTag};

/// SQL function used for case-insensitive filtering (Unicode aware)
const FOLD_FUNCTION: &str = "fold_case";

const SELECT_COLUMNS: &str = "SELECT id, ip_address, mac_address, name, created_at FROM devices";

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Storage operations for devices
///
/// Every operation is a single transaction. Inputs are expected to be
/// validated already; the gateway only enforces uniqueness.
pub trait DeviceGateway: Send + Sync {
    /// Insert a device and return its id
    fn create(&self, input: &DeviceInput) -> RegistryResult<i64>;

    /// Replace ip, mac and name of an existing device
    fn update(&self, id: i64, input: &DeviceInput) -> RegistryResult<()>;

    /// Remove by id; `Ok(false)` when nothing matched
    fn delete_by_id(&self, id: i64) -> RegistryResult<bool>;

    /// Remove by IP; `Ok(false)` when nothing matched
    fn delete_by_ip(&self, ip: &str) -> RegistryResult<bool>;

    fn list(&self, query: &DeviceQuery) -> RegistryResult<Vec<Device>>;

    fn get(&self, id: i64) -> RegistryResult<Option<Device>>;

    fn count(&self) -> RegistryResult<u64>;
}

// =============================================================================
// STORE
// =============================================================================

/// SQLite-backed device store
///
/// Holds a single connection. The connection closes when the store is dropped.
pub struct DeviceStore {
    conn: Mutex<Connection>,
    location: String,
}

impl DeviceStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path, config: &DatabaseConfig) -> RegistryResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    RegistryError::StorageUnavailable(format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            RegistryError::StorageUnavailable(format!(
                "Failed to open database {}: {}",
                path.display(),
                e
            ))
        })?;

        let store = Self::from_connection(conn, path.display().to_string(), config)?;
        logger::info(
            LogTag::Database,
            &format!("Devices database ready at {}", store.location),
        );
        Ok(store)
    }

    /// Private in-memory store (tests and dry runs)
    pub fn open_in_memory() -> RegistryResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            RegistryError::StorageUnavailable(format!("Failed to open in-memory database: {}", e))
        })?;
        let config = DatabaseConfig {
            wal: false,
            ..DatabaseConfig::default()
        };
        Self::from_connection(conn, ":memory:".to_string(), &config)
    }

    fn from_connection(
        conn: Connection,
        location: String,
        config: &DatabaseConfig,
    ) -> RegistryResult<Self> {
        configure_connection(&conn, config).map_err(|e| {
            RegistryError::StorageUnavailable(format!("Failed to configure {}: {}", location, e))
        })?;
        initialize_schema(&conn).map_err(|e| {
            RegistryError::StorageUnavailable(format!(
                "Failed to initialize schema in {}: {}",
                location, e
            ))
        })?;

        logger::debug(
            LogTag::Database,
            &format!(
                "Connection configured (wal={}, busy_timeout={}ms) for {}",
                config.wal, config.busy_timeout_ms, location
            ),
        );

        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// Database file path, or ":memory:"
    pub fn location(&self) -> &str {
        &self.location
    }
}

fn configure_connection(conn: &Connection, config: &DatabaseConfig) -> rusqlite::Result<()> {
    if config.wal {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;

    Ok(())
}

fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip_address TEXT UNIQUE NOT NULL,
            mac_address TEXT UNIQUE NOT NULL COLLATE NOCASE,
            name TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_devices_created_at ON devices(created_at DESC)",
        [],
    )?;

    Ok(())
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Turn a UNIQUE violation into `DuplicateKey`, anything else into `Storage`
fn map_write_error(err: rusqlite::Error, input: &DeviceInput) -> RegistryError {
    if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            let on_mac = message
                .as_deref()
                .map(|m| m.contains("devices.mac_address"))
                .unwrap_or(false);
            return if on_mac {
                RegistryError::DuplicateKey {
                    field: KeyField::MacAddress,
                    value: input.mac_address.clone(),
                }
            } else {
                RegistryError::DuplicateKey {
                    field: KeyField::IpAddress,
                    value: input.ip_address.clone(),
                }
            };
        }
    }
    RegistryError::Storage(err.to_string())
}

fn row_to_device(row: &rusqlite::Row<'_>) -> rusqlite::Result<Device> {
    Ok(Device {
        id: row.get(0)?,
        ip_address: row.get(1)?,
        mac_address: row.get(2)?,
        name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

// =============================================================================
// GATEWAY IMPLEMENTATION
// =============================================================================

impl DeviceGateway for DeviceStore {
    fn create(&self, input: &DeviceInput) -> RegistryResult<i64> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO devices (ip_address, mac_address, name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![input.ip_address, input.mac_address, input.name, Utc::now()],
        )
        .map_err(|e| map_write_error(e, input))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        logger::debug(
            LogTag::Database,
            &format!("Inserted device id={} ip={}", id, input.ip_address),
        );
        Ok(id)
    }

    fn update(&self, id: i64, input: &DeviceInput) -> RegistryResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx
            .execute(
                "UPDATE devices SET ip_address = ?1, mac_address = ?2, name = ?3 WHERE id = ?4",
                params![input.ip_address, input.mac_address, input.name, id],
            )
            .map_err(|e| map_write_error(e, input))?;

        if changed == 0 {
            return Err(RegistryError::NotFound { id });
        }
        tx.commit()?;

        logger::debug(LogTag::Database, &format!("Updated device id={}", id));
        Ok(())
    }

    fn delete_by_id(&self, id: i64) -> RegistryResult<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM devices WHERE id = ?1", params![id])?;
        tx.commit()?;

        logger::debug(
            LogTag::Database,
            &format!("Delete id={} removed {} row(s)", id, removed),
        );
        Ok(removed > 0)
    }

    fn delete_by_ip(&self, ip: &str) -> RegistryResult<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM devices WHERE ip_address = ?1", params![ip])?;
        tx.commit()?;

        logger::debug(
            LogTag::Database,
            &format!("Delete ip={} removed {} row(s)", ip, removed),
        );
        Ok(removed > 0)
    }

    fn list(&self, query: &DeviceQuery) -> RegistryResult<Vec<Device>> {
        let order_clause = match query.order {
            ListOrder::Insertion => "ORDER BY id ASC",
            ListOrder::Newest => "ORDER BY created_at DESC, id DESC",
        };

        let conn = self.conn.lock();
        let devices = match query.effective_filter() {
            Some(filter) => {
                let sql = format!(
                    "{} WHERE instr({f}(ip_address), ?1) > 0
                        OR instr({f}(mac_address), ?1) > 0
                        OR instr({f}(name), ?1) > 0
                     {}",
                    SELECT_COLUMNS,
                    order_clause,
                    f = FOLD_FUNCTION
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![filter.to_lowercase()], row_to_device)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("{} {}", SELECT_COLUMNS, order_clause);
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], row_to_device)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(devices)
    }

    fn get(&self, id: i64) -> RegistryResult<Option<Device>> {
        let conn = self.conn.lock();
        let device = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                row_to_device,
            )
            .optional()?;
        Ok(device)
    }

    fn count(&self) -> RegistryResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
