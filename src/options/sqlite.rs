//! SQLite-backed option store.

use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::{now_ms, OptionStore};
use crate::error::StoreResult;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Option store over a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // WAL for concurrent readers across host worker processes
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> StoreResult<()> {
        let mut conn = self.conn.lock().unwrap();
        embedded::migrations::runner().run(&mut *conn)?;
        Ok(())
    }
}

impl OptionStore for SqliteStore {
    fn read(&self, name: &str) -> StoreResult<Option<Value>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM options WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, name: &str, value: &Value) -> StoreResult<bool> {
        let serialized = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();

        let existing: Option<String> = conn
            .query_row(
                "SELECT value FROM options WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        if existing.as_deref() == Some(serialized.as_str()) {
            debug!(option = name, "option unchanged; skipping write");
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO options (name, value, updated_at_ms) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = ?2, updated_at_ms = ?3",
            params![name, serialized, now_ms()],
        )?;
        Ok(true)
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM options WHERE name = ?1", params![name])?;
        Ok(deleted > 0)
    }
}
