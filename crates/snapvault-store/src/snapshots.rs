//! Row-level operations over the snapshot ledger and file references
//!
//! Free functions over `&Connection` / `&Transaction`; write helpers are
//! meant to be called inside a transaction owned by the operation.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Transaction};
use snapvault_core::errors::{SvError, SvErrorKind};

/// A raw row from the `snapshots` table
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    /// Store-assigned monotonic id
    pub id: i64,
    /// Wall-clock capture instant, `YYYY-MM-DD HH:MM:SS`
    pub taken_at: String,
}

/// A raw row from the `files` table
#[derive(Debug, Clone)]
pub struct FileRow {
    pub snapshot_id: i64,
    pub path: String,
    pub hash: String,
}

/// Insert a snapshot row stamped `taken_at`; returns the assigned id
pub fn insert_snapshot(tx: &Transaction, taken_at: &str) -> Result<i64> {
    tx.execute("INSERT INTO snapshots (taken_at) VALUES (?1)", [taken_at])
        .map_err(from_rusqlite)?;
    Ok(tx.last_insert_rowid())
}

/// Record that `path` in snapshot `snapshot_id` names content `hash`
pub fn insert_file(tx: &Transaction, snapshot_id: i64, path: &str, hash: &str) -> Result<()> {
    tx.execute(
        "INSERT INTO files (snapshot_id, path, hash) VALUES (?1, ?2, ?3)",
        rusqlite::params![snapshot_id, path, hash],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// Fetch one snapshot row, `None` if the id is unknown
pub fn fetch_snapshot(conn: &Connection, snapshot_id: i64) -> Result<Option<SnapshotRow>> {
    conn.query_row(
        "SELECT id, taken_at FROM snapshots WHERE id = ?1",
        [snapshot_id],
        |row| {
            Ok(SnapshotRow {
                id: row.get(0)?,
                taken_at: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Require a snapshot to exist, mapping absence to `UnknownSnapshot`
pub fn require_snapshot(conn: &Connection, snapshot_id: i64) -> Result<SnapshotRow> {
    fetch_snapshot(conn, snapshot_id)?.ok_or_else(|| {
        SvError::new(SvErrorKind::UnknownSnapshot)
            .with_snapshot_id(snapshot_id)
            .with_message("snapshot not found")
    })
}

/// List all snapshots in ascending id order
pub fn list_snapshots(conn: &Connection) -> Result<Vec<SnapshotRow>> {
    let mut stmt = conn
        .prepare("SELECT id, taken_at FROM snapshots ORDER BY id")
        .map_err(from_rusqlite)?;
    let rows: std::result::Result<Vec<_>, _> = stmt
        .query_map([], |row| {
            Ok(SnapshotRow {
                id: row.get(0)?,
                taken_at: row.get(1)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect();
    rows.map_err(from_rusqlite)
}

/// List the file references of a snapshot, ordered by path
pub fn files_for_snapshot(conn: &Connection, snapshot_id: i64) -> Result<Vec<FileRow>> {
    let mut stmt = conn
        .prepare("SELECT snapshot_id, path, hash FROM files WHERE snapshot_id = ?1 ORDER BY path")
        .map_err(from_rusqlite)?;
    let rows: std::result::Result<Vec<_>, _> = stmt
        .query_map([snapshot_id], |row| {
            Ok(FileRow {
                snapshot_id: row.get(0)?,
                path: row.get(1)?,
                hash: row.get(2)?,
            })
        })
        .map_err(from_rusqlite)?
        .collect();
    rows.map_err(from_rusqlite)
}

/// Delete the file references of a snapshot; returns rows removed
pub fn delete_files(tx: &Transaction, snapshot_id: i64) -> Result<usize> {
    tx.execute("DELETE FROM files WHERE snapshot_id = ?1", [snapshot_id])
        .map_err(from_rusqlite)
}

/// Delete a snapshot row
pub fn delete_snapshot(tx: &Transaction, snapshot_id: i64) -> Result<()> {
    tx.execute("DELETE FROM snapshots WHERE id = ?1", [snapshot_id])
        .map_err(from_rusqlite)?;
    Ok(())
}

/// Sum of blob lengths over every content this snapshot references
///
/// Shared content counts here for each snapshot that names it.
pub fn snapshot_size(conn: &Connection, snapshot_id: i64) -> Result<u64> {
    let total: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(LENGTH(c.blob)), 0)
             FROM files f JOIN contents c ON c.hash = f.hash
             WHERE f.snapshot_id = ?1",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    Ok(total as u64)
}

/// Sum of blob lengths over contents referenced only by this snapshot
///
/// These are the bytes that pruning the snapshot would reclaim.
pub fn snapshot_distinct_size(conn: &Connection, snapshot_id: i64) -> Result<u64> {
    let total: i64 = conn
        .query_row(
            "SELECT COALESCE(SUM(LENGTH(c.blob)), 0)
             FROM contents c
             WHERE EXISTS (
                 SELECT 1 FROM files f
                 WHERE f.hash = c.hash AND f.snapshot_id = ?1
             )
             AND NOT EXISTS (
                 SELECT 1 FROM files f
                 WHERE f.hash = c.hash AND f.snapshot_id <> ?1
             )",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)?;
    Ok(total as u64)
}

/// Hashes named by file references with no matching content row
///
/// A non-empty result implies prior corruption or external tampering.
pub fn dangling_hashes(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT f.hash
             FROM files f LEFT JOIN contents c ON c.hash = f.hash
             WHERE c.hash IS NULL
             ORDER BY f.hash",
        )
        .map_err(from_rusqlite)?;
    let rows: std::result::Result<Vec<String>, _> = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect();
    rows.map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::db::Store;

    fn seed_snapshot(store: &mut Store, files: &[(&str, &[u8])]) -> i64 {
        let tx = store.transaction().unwrap();
        let id = insert_snapshot(&tx, "2026-01-01 00:00:00").unwrap();
        for (path, bytes) in files {
            let (hash, _) = content::put(&tx, bytes).unwrap();
            insert_file(&tx, id, path, &hash).unwrap();
        }
        tx.commit().unwrap();
        id
    }

    #[test]
    fn test_insert_snapshot_assigns_increasing_ids() {
        let mut store = Store::open_in_memory().unwrap();
        let first = seed_snapshot(&mut store, &[]);
        let second = seed_snapshot(&mut store, &[]);
        assert!(second > first);
    }

    #[test]
    fn test_fetch_snapshot_roundtrip() {
        let mut store = Store::open_in_memory().unwrap();
        let id = seed_snapshot(&mut store, &[]);
        let row = fetch_snapshot(store.conn(), id).unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.taken_at, "2026-01-01 00:00:00");
    }

    #[test]
    fn test_require_snapshot_unknown_id() {
        let store = Store::open_in_memory().unwrap();
        let err = require_snapshot(store.conn(), 7).unwrap_err();
        assert_eq!(err.kind(), SvErrorKind::UnknownSnapshot);
        assert_eq!(err.snapshot_id(), Some(7));
    }

    #[test]
    fn test_files_for_snapshot_ordered_by_path() {
        let mut store = Store::open_in_memory().unwrap();
        let id = seed_snapshot(&mut store, &[("z.txt", b"z"), ("a.txt", b"a")]);
        let files = files_for_snapshot(store.conn(), id).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.txt", "z.txt"]);
    }

    #[test]
    fn test_duplicate_path_in_snapshot_is_constraint() {
        let mut store = Store::open_in_memory().unwrap();
        let tx = store.transaction().unwrap();
        let id = insert_snapshot(&tx, "2026-01-01 00:00:00").unwrap();
        let (hash, _) = content::put(&tx, b"x").unwrap();
        insert_file(&tx, id, "same.txt", &hash).unwrap();
        let err = insert_file(&tx, id, "same.txt", &hash).unwrap_err();
        assert_eq!(err.kind(), SvErrorKind::Constraint);
    }

    #[test]
    fn test_size_counts_shared_content_per_snapshot() {
        let mut store = Store::open_in_memory().unwrap();
        // Same 5 bytes under two paths: stored once, sized twice
        let id = seed_snapshot(&mut store, &[("a.txt", b"hello"), ("b.txt", b"hello")]);
        assert_eq!(snapshot_size(store.conn(), id).unwrap(), 10);
        assert_eq!(snapshot_distinct_size(store.conn(), id).unwrap(), 5);
    }

    #[test]
    fn test_distinct_size_excludes_content_shared_across_snapshots() {
        let mut store = Store::open_in_memory().unwrap();
        let first = seed_snapshot(&mut store, &[("x", b"x")]);
        let second = seed_snapshot(&mut store, &[("x", b"x")]);
        assert_eq!(snapshot_size(store.conn(), first).unwrap(), 1);
        assert_eq!(snapshot_distinct_size(store.conn(), first).unwrap(), 0);
        assert_eq!(snapshot_distinct_size(store.conn(), second).unwrap(), 0);
    }

    #[test]
    fn test_dangling_hashes_empty_on_consistent_store() {
        let mut store = Store::open_in_memory().unwrap();
        seed_snapshot(&mut store, &[("a.txt", b"a")]);
        assert!(dangling_hashes(store.conn()).unwrap().is_empty());
    }
}
