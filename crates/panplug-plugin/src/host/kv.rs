//! Small persistent string store exposed to scripts.
//!
//! The database file is opened on first use so that plugins which never
//! touch the store do not create it.

use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::api::params::format_timestamp;
use crate::error::PluginResult;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'string',
    updated_at TEXT NOT NULL
)";

/// Key/value store backed by a single SQLite file.
#[derive(Debug)]
pub struct KvStore {
    /// Database location; `None` keeps everything in memory.
    path: Option<PathBuf>,
    /// Lazily opened connection.
    conn: Mutex<Option<Connection>>,
}

impl KvStore {
    /// Creates a store rooted at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            conn: Mutex::new(None),
        }
    }

    /// Creates a store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            conn: Mutex::new(None),
        }
    }

    /// Database file location, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reads a string value.
    pub fn get_string(&self, key: &str) -> PluginResult<Option<String>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv WHERE key = ?1 AND type = 'string'",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Inserts or replaces a string value.
    pub fn put_string(&self, key: &str, value: &str) -> PluginResult<()> {
        let now = format_timestamp(Local::now());
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, type, updated_at) VALUES (?1, ?2, 'string', ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                     type = excluded.type, updated_at = excluded.updated_at",
                params![key, value, now],
            )?;
            Ok(())
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> PluginResult<T>) -> PluginResult<T> {
        let mut guard = self.conn.lock();
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        let result = f(&conn);
        *guard = Some(conn);
        result
    }

    fn open(&self) -> PluginResult<Connection> {
        let conn = match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                debug!(path = %path.display(), "Opening KV store");
                Connection::open(path)?
            }
            None => Connection::open_in_memory()?,
        };
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}
