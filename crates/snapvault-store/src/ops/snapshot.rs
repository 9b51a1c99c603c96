//! Snapshot capture
//!
//! Walks a source tree and records every regular file inside one write
//! transaction. A fatal error rolls the transaction back so an aborted
//! snapshot leaves no trace in the store.

#![allow(clippy::result_large_err)]

use crate::content;
use crate::db::Store;
use crate::errors::{from_rusqlite, Result};
use crate::snapshots;
use chrono::Local;
use snapvault_core::errors::{SvError, SvErrorKind};
use snapvault_core::{EngineConfig, Walker};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

/// Why a file was left out of a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Byte length exceeded the configured cap
    TooLarge { len: u64 },
    /// Read was denied and the engine is configured to continue
    Unreadable,
}

impl SkipReason {
    /// Stable code of the matching error kind, for warning lines
    pub fn code(&self) -> &'static str {
        match self {
            SkipReason::TooLarge { .. } => SvErrorKind::TooLarge.code(),
            SkipReason::Unreadable => SvErrorKind::FileIo.code(),
        }
    }
}

/// A file skipped during capture, reported after success
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: SkipReason,
}

/// Result of a successful snapshot
#[derive(Debug)]
pub struct SnapshotOutcome {
    /// Store-assigned id of the new snapshot
    pub snapshot_id: i64,
    /// Per-file warnings aggregated during the walk
    pub skipped: Vec<SkippedFile>,
}

/// Capture a point-in-time snapshot of `target_dir`
///
/// Every stored file is deduplicated against existing content by its
/// SHA-256. Oversized files are skipped with a warning; unreadable files
/// are fatal unless `config.skip_unreadable` is set.
pub fn snapshot(
    store: &mut Store,
    walker: &dyn Walker,
    config: &EngineConfig,
    target_dir: &Path,
) -> Result<SnapshotOutcome> {
    let files = walker.walk(target_dir)?;

    let tx = store.transaction()?;
    let taken_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let snapshot_id = snapshots::insert_snapshot(&tx, &taken_at)?;
    tracing::debug!(snapshot_id, target = %target_dir.display(), "snapshot started");

    let mut skipped = Vec::new();
    let mut stored = 0usize;
    for entry in files {
        let file = entry?;

        if file.len > config.max_file_len {
            tracing::warn!(
                path = %file.relative_path,
                len = file.len,
                cap = config.max_file_len,
                "file exceeds size cap, skipping"
            );
            skipped.push(SkippedFile {
                relative_path: file.relative_path,
                reason: SkipReason::TooLarge { len: file.len },
            });
            continue;
        }

        let bytes = match fs::read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == IoErrorKind::PermissionDenied && config.skip_unreadable => {
                tracing::warn!(path = %file.relative_path, "permission denied, skipping");
                skipped.push(SkippedFile {
                    relative_path: file.relative_path,
                    reason: SkipReason::Unreadable,
                });
                continue;
            }
            Err(e) => {
                return Err(SvError::new(SvErrorKind::FileIo)
                    .with_op("snapshot")
                    .with_path(file.relative_path)
                    .with_message(e.to_string()))
            }
        };

        // The file may have grown between enumeration and read
        if bytes.len() as u64 > config.max_file_len {
            tracing::warn!(
                path = %file.relative_path,
                len = bytes.len(),
                "file exceeds size cap, skipping"
            );
            skipped.push(SkippedFile {
                relative_path: file.relative_path,
                reason: SkipReason::TooLarge {
                    len: bytes.len() as u64,
                },
            });
            continue;
        }

        let (hash, was_new) = content::put(&tx, &bytes)?;
        snapshots::insert_file(&tx, snapshot_id, &file.relative_path, &hash)?;
        stored += 1;
        tracing::debug!(
            path = %file.relative_path,
            hash = %hash,
            was_new,
            "file recorded"
        );
    }

    tx.commit().map_err(from_rusqlite)?;
    tracing::info!(
        snapshot_id,
        stored,
        skipped = skipped.len(),
        "snapshot committed"
    );

    Ok(SnapshotOutcome {
        snapshot_id,
        skipped,
    })
}
