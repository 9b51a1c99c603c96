//! Database connection management
//!
//! A `Store` owns one SQLite connection. Opening installs the schema via
//! the migrations framework; write operations run inside scoped
//! transactions obtained from the store.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::migrations;
use rusqlite::{Connection, Transaction};
use snapvault_core::errors::{SvError, SvErrorKind};
use std::path::Path;

/// Handle on an open backup database
///
/// Instantiated per invocation; the engine keeps no global connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a backup database at `path`
    ///
    /// Installs the schema and indices on first creation. Idempotent:
    /// reopening an up-to-date database applies nothing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = Connection::open(path).map_err(from_rusqlite)?;
        configure(&conn)?;
        migrations::apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(from_rusqlite)?;
        configure(&conn)?;
        migrations::apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Begin a write transaction
    ///
    /// Dropping the transaction without an explicit `commit()` rolls it
    /// back, so the write lock is released on every exit path.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction().map_err(from_rusqlite)
    }

    /// Read-only access to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Substrate-level structural check (page and index level)
    ///
    /// Distinct from the semantic `check` operation: this asks SQLite to
    /// validate its own file structure.
    pub fn integrity_check(&self) -> Result<()> {
        let verdict: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        if verdict == "ok" {
            Ok(())
        } else {
            Err(SvError::new(SvErrorKind::StoreIo)
                .with_op("integrity_check")
                .with_message(verdict))
        }
    }
}

/// Configure a connection with the settings the engine relies on
fn configure(conn: &Connection) -> Result<()> {
    // The schema declares REFERENCES clauses; SQLite only enforces them
    // with this pragma on.
    conn.execute("PRAGMA foreign_keys = ON", [])
        .map_err(from_rusqlite)?;
    Ok(())
}
