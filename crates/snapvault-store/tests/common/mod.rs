#![allow(dead_code)]

//! Shared fixtures for store integration tests

use snapvault_core::walker::{FileIter, SourceFile, Walker};
use snapvault_core::{EngineConfig, Result, SvError, SvErrorKind};
use snapvault_store::ops::{self, SnapshotOutcome};
use snapvault_store::Store;
use std::fs;
use std::path::Path;

/// Write `files` (relative path, bytes) under `root`
pub fn populate(root: &Path, files: &[(&str, &[u8])]) {
    for (rel, bytes) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, bytes).unwrap();
    }
}

/// Capture `source` into `store` with the default config
pub fn take_snapshot(store: &mut Store, source: &Path) -> SnapshotOutcome {
    let config = EngineConfig::default();
    let walker = snapvault_core::DirWalker::new(&config);
    ops::snapshot(store, &walker, &config, source).unwrap()
}

/// Read a whole restored tree back as (relative path, bytes) pairs
pub fn read_tree(root: &Path) -> std::collections::BTreeMap<String, Vec<u8>> {
    let config = EngineConfig::default();
    let walker = snapvault_core::DirWalker::new(&config);
    snapvault_core::Walker::walk(&walker, root)
        .unwrap()
        .map(|r| r.unwrap())
        .map(|f| (f.relative_path.clone(), fs::read(&f.path).unwrap()))
        .collect()
}

/// Count rows of a table through the store's connection
pub fn count_rows(store: &Store, table: &str) -> i64 {
    store
        .conn()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .unwrap()
}

/// Walker yielding a canned sequence, optionally failing partway
///
/// Exercises the abort path of snapshot capture without a real
/// filesystem race.
pub struct ScriptedWalker {
    pub files: Vec<SourceFile>,
    pub fail_after: Option<usize>,
}

impl Walker for ScriptedWalker {
    fn walk(&self, _root: &Path) -> Result<FileIter> {
        let mut items: Vec<Result<SourceFile>> = self.files.iter().cloned().map(Ok).collect();
        if let Some(at) = self.fail_after {
            items.truncate(at);
            items.push(Err(SvError::new(SvErrorKind::FileIo)
                .with_op("walk")
                .with_message("file vanished during walk")));
        }
        Ok(Box::new(items.into_iter()))
    }
}
