//! Restore operation
//!
//! Materializes a snapshot into an output directory. On success the
//! target subtree contains exactly the snapshot's file references with
//! bit-identical contents. Partial writes on failure are not rolled back
//! on disk; the error is surfaced to the caller.

#![allow(clippy::result_large_err)]

use crate::content;
use crate::db::Store;
use crate::errors::Result;
use crate::snapshots;
use snapvault_core::errors::file_io;
use std::fs;
use std::path::Path;

/// Write every file of `snapshot_id` under `output_dir`
///
/// Creates `output_dir` and intermediate directories as needed; existing
/// files at restored paths are overwritten.
pub fn restore(store: &Store, snapshot_id: i64, output_dir: &Path) -> Result<()> {
    let conn = store.conn();
    snapshots::require_snapshot(conn, snapshot_id)?;

    fs::create_dir_all(output_dir)
        .map_err(|e| file_io("restore", e).with_path(output_dir.display().to_string()))?;

    let files = snapshots::files_for_snapshot(conn, snapshot_id)?;
    for file in &files {
        let target = output_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| file_io("restore", e).with_path(parent.display().to_string()))?;
        }
        let bytes = content::get(conn, &file.hash)?;
        fs::write(&target, bytes)
            .map_err(|e| file_io("restore", e).with_path(target.display().to_string()))?;
    }

    tracing::info!(snapshot_id, files = files.len(), "snapshot restored");
    Ok(())
}
