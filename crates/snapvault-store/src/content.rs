//! Content-addressed layer over the `contents` relation
//!
//! Every distinct byte-sequence is stored exactly once, keyed by the
//! SHA-256 of its bytes. Writes are idempotent and run inside the
//! caller's transaction.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Transaction};
use snapvault_core::digest::digest_hex;
use snapvault_core::errors::{SvError, SvErrorKind};

/// Insert `bytes` keyed by their digest if not already present
///
/// Returns the hash and whether a new row was created. Zero-length input
/// is a valid content (the digest of the empty string is its key).
pub fn put(tx: &Transaction, bytes: &[u8]) -> Result<(String, bool)> {
    let hash = digest_hex(bytes);
    let inserted = tx
        .execute(
            "INSERT OR IGNORE INTO contents (hash, blob) VALUES (?1, ?2)",
            rusqlite::params![hash, bytes],
        )
        .map_err(from_rusqlite)?;
    Ok((hash, inserted == 1))
}

/// Fetch content bytes by hash
pub fn get(conn: &Connection, hash: &str) -> Result<Vec<u8>> {
    conn.query_row(
        "SELECT blob FROM contents WHERE hash = ?1",
        [hash],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)?
    .ok_or_else(|| {
        SvError::new(SvErrorKind::MissingContent)
            .with_hash(hash)
            .with_message("content row not found")
    })
}

/// Stored byte count of a content row
pub fn size(conn: &Connection, hash: &str) -> Result<u64> {
    let len: Option<i64> = conn
        .query_row(
            "SELECT LENGTH(blob) FROM contents WHERE hash = ?1",
            [hash],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    match len {
        Some(len) => Ok(len as u64),
        None => Err(SvError::new(SvErrorKind::MissingContent)
            .with_hash(hash)
            .with_message("content row not found")),
    }
}

/// Delete every content row that no file reference names; returns count
pub fn delete_orphans(tx: &Transaction) -> Result<usize> {
    tx.execute(
        "DELETE FROM contents
         WHERE NOT EXISTS (SELECT 1 FROM files WHERE files.hash = contents.hash)",
        [],
    )
    .map_err(from_rusqlite)
}

/// Total stored bytes across all distinct content rows
pub fn total_size(conn: &Connection) -> Result<u64> {
    let total: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(LENGTH(blob)), 0) FROM contents",
            [],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    Ok(total as u64)
}

/// Visit every content row without materializing the table
pub fn for_each<F>(conn: &Connection, mut visit: F) -> Result<()>
where
    F: FnMut(&str, &[u8]),
{
    let mut stmt = conn
        .prepare("SELECT hash, blob FROM contents ORDER BY hash")
        .map_err(from_rusqlite)?;
    let mut rows = stmt.query([]).map_err(from_rusqlite)?;
    while let Some(row) = rows.next().map_err(from_rusqlite)? {
        let hash: String = row.get(0).map_err(from_rusqlite)?;
        let blob: Vec<u8> = row.get(1).map_err(from_rusqlite)?;
        visit(&hash, &blob);
    }
    Ok(())
}
