//! Prune operation
//!
//! Removes a snapshot and garbage-collects content no longer referenced
//! by any remaining snapshot, in one transaction.

#![allow(clippy::result_large_err)]

use crate::content;
use crate::db::Store;
use crate::errors::{from_rusqlite, Result};
use crate::snapshots;

/// Delete snapshot `snapshot_id` and reclaim orphaned content
///
/// Shared content survives as long as any other snapshot references it,
/// so pruning never affects the restorability of other snapshots.
pub fn prune(store: &mut Store, snapshot_id: i64) -> Result<()> {
    let tx = store.transaction()?;
    snapshots::require_snapshot(&tx, snapshot_id)?;

    let removed_refs = snapshots::delete_files(&tx, snapshot_id)?;
    snapshots::delete_snapshot(&tx, snapshot_id)?;
    let removed_contents = content::delete_orphans(&tx)?;

    tx.commit().map_err(from_rusqlite)?;
    tracing::info!(
        snapshot_id,
        removed_refs,
        removed_contents,
        "snapshot pruned"
    );
    Ok(())
}
