//! Check operation
//!
//! Read-only verification of stored content. Recomputes the digest of
//! every content row and detects file references whose hash has no
//! content row. Damage is reported, never raised.

#![allow(clippy::result_large_err)]

use crate::content;
use crate::db::Store;
use crate::errors::Result;
use crate::snapshots;
use serde::Serialize;
use snapvault_core::digest::digest_hex;

/// Outcome of a verification scan
///
/// An empty report means every content row hashes to its key and every
/// file reference resolves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Content rows whose bytes no longer match their hash
    pub corrupt_hashes: Vec<String>,
    /// Hashes referenced by files with no content row at all
    pub missing_hashes: Vec<String>,
}

impl CheckReport {
    /// True when no damage was found
    pub fn is_healthy(&self) -> bool {
        self.corrupt_hashes.is_empty() && self.missing_hashes.is_empty()
    }
}

/// Scan the whole store for silent corruption
pub fn check(store: &Store) -> Result<CheckReport> {
    let conn = store.conn();

    let mut corrupt_hashes = Vec::new();
    content::for_each(conn, |hash, blob| {
        if digest_hex(blob) != hash {
            tracing::warn!(hash = %hash, "content does not match its hash");
            corrupt_hashes.push(hash.to_string());
        }
    })?;

    let missing_hashes = snapshots::dangling_hashes(conn)?;
    for hash in &missing_hashes {
        tracing::warn!(hash = %hash, "file reference has no content row");
    }

    let report = CheckReport {
        corrupt_hashes,
        missing_hashes,
    };
    tracing::info!(
        corrupt = report.corrupt_hashes.len(),
        missing = report.missing_hashes.len(),
        healthy = report.is_healthy(),
        "check finished"
    );
    Ok(report)
}
