//! List operation
//!
//! Read-only report over the snapshot ledger with disk usage metrics.

#![allow(clippy::result_large_err)]

use crate::content;
use crate::db::Store;
use crate::errors::Result;
use crate::snapshots;
use serde::Serialize;

/// One row of the list report
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotListRow {
    pub id: i64,
    pub taken_at: String,
    /// Bytes of every content this snapshot references; shared content
    /// counts in each snapshot that names it
    pub size: u64,
    /// Bytes reclaimed if this snapshot were pruned
    pub distinct_size: u64,
}

/// Full list report
///
/// The per-row `size` column generally sums to more than `total_size`
/// when dedup is effective; the `distinct_size` column sums to exactly
/// `total_size`.
#[derive(Debug, Clone, Serialize)]
pub struct ListReport {
    pub rows: Vec<SnapshotListRow>,
    /// On-disk footprint of unique data across the whole store
    pub total_size: u64,
}

/// Produce the list report in ascending snapshot id order
pub fn list(store: &Store) -> Result<ListReport> {
    let conn = store.conn();
    let mut rows = Vec::new();
    for snap in snapshots::list_snapshots(conn)? {
        let size = snapshots::snapshot_size(conn, snap.id)?;
        let distinct_size = snapshots::snapshot_distinct_size(conn, snap.id)?;
        rows.push(SnapshotListRow {
            id: snap.id,
            taken_at: snap.taken_at,
            size,
            distinct_size,
        });
    }
    let total_size = content::total_size(conn)?;
    Ok(ListReport { rows, total_size })
}
