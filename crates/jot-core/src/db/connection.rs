//! Database connection management

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::migrations;

/// Handle to the notes database.
///
/// Clones share a single connection; access is serialized through an
/// internal lock so the handle can be moved freely across worker threads.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open a database at the given path, creating it if it doesn't exist.
    ///
    /// Runs migrations automatically and seeds the welcome notes when the
    /// database is brand new.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn, true)
    }

    /// Open an in-memory database (useful for testing). Never seeded.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, false)
    }

    fn init(conn: Connection, seed: bool) -> Result<Self> {
        configure(&conn);
        let fresh = migrations::get_version(&conn)? == 0;
        migrations::run(&conn)?;
        if seed && fresh {
            migrations::seed_welcome_notes(&conn)?;
        }
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the locked connection.
    pub(crate) fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::Database("connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

/// Configure `SQLite` for optimal performance
fn configure(conn: &Connection) {
    // journal_mode returns a row and only applies to file-backed databases
    conn.query_row("PRAGMA journal_mode = WAL", [], |_row| Ok(()))
        .ok();
    conn.pragma_update(None, "synchronous", "NORMAL").ok();
    conn.pragma_update(None, "foreign_keys", "ON").ok();
}
