//! Filesystem walk contract for snapshot sources
//!
//! The snapshot operation consumes a lazy stream of regular files. The
//! contract: relative paths are forward-slash separated, non-empty, carry
//! no `.` or `..` segments, and never begin with `/`. Symbolic links and
//! special files are excluded.

use crate::config::EngineConfig;
use crate::errors::{Result, SvError, SvErrorKind};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file yielded by a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Canonical store path relative to the walk root
    pub relative_path: String,
    /// Absolute path used to open the file
    pub path: PathBuf,
    /// On-disk length in bytes at enumeration time
    pub len: u64,
}

/// Lazy stream of walk results
pub type FileIter = Box<dyn Iterator<Item = Result<SourceFile>>>;

/// Seam between snapshot capture and the filesystem
///
/// The production implementation is [`DirWalker`]; tests substitute canned
/// sequences to exercise abort paths without a real filesystem.
pub trait Walker {
    /// Enumerate every regular file under `root`, in unspecified order
    fn walk(&self, root: &Path) -> Result<FileIter>;
}

/// Production walker over the real filesystem
#[derive(Debug, Clone, Copy)]
pub struct DirWalker {
    skip_unreadable: bool,
}

impl DirWalker {
    /// Build a walker honouring the engine's unreadable-entry policy
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            skip_unreadable: config.skip_unreadable,
        }
    }
}

impl Walker for DirWalker {
    fn walk(&self, root: &Path) -> Result<FileIter> {
        let meta = fs::metadata(root).map_err(|e| {
            SvError::new(SvErrorKind::FileIo)
                .with_op("walk")
                .with_path(root.display().to_string())
                .with_message(e.to_string())
        })?;
        if !meta.is_dir() {
            return Err(SvError::new(SvErrorKind::FileIo)
                .with_op("walk")
                .with_path(root.display().to_string())
                .with_message("target is not a directory"));
        }

        let root_owned = root.to_path_buf();
        let skip_unreadable = self.skip_unreadable;
        let iter = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(move |entry| match entry {
                Err(e) if skip_unreadable => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    None
                }
                Err(e) => Some(Err(SvError::new(SvErrorKind::FileIo)
                    .with_op("walk")
                    .with_message(e.to_string()))),
                Ok(entry) => {
                    // Symlinks report their own file type when not followed,
                    // so is_file() excludes them along with dirs and specials.
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    let len = match entry.metadata() {
                        Ok(m) => m.len(),
                        Err(e) if skip_unreadable => {
                            tracing::warn!(
                                path = %entry.path().display(),
                                error = %e,
                                "skipping unreadable entry"
                            );
                            return None;
                        }
                        Err(e) => {
                            return Some(Err(SvError::new(SvErrorKind::FileIo)
                                .with_op("walk")
                                .with_path(entry.path().display().to_string())
                                .with_message(e.to_string())))
                        }
                    };
                    Some(
                        canonical_relative(&root_owned, entry.path()).map(|relative_path| {
                            SourceFile {
                                relative_path,
                                path: entry.into_path(),
                                len,
                            }
                        }),
                    )
                }
            });
        Ok(Box::new(iter))
    }
}

/// Render `path` relative to `root` in canonical store form
///
/// Paths are stored as TEXT and must restore byte-identically, so names
/// that are not valid UTF-8 are rejected rather than converted lossily.
fn canonical_relative(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        SvError::new(SvErrorKind::Internal)
            .with_op("walk")
            .with_path(path.display().to_string())
            .with_message("walked path escapes the walk root")
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(s) => segments.push(s),
                None => {
                    return Err(SvError::new(SvErrorKind::FileIo)
                        .with_op("walk")
                        .with_path(path.display().to_string())
                        .with_message("file name is not valid UTF-8"))
                }
            },
            _ => {
                return Err(SvError::new(SvErrorKind::Internal)
                    .with_op("walk")
                    .with_path(path.display().to_string())
                    .with_message("non-canonical component in walked path"))
            }
        }
    }

    if segments.is_empty() {
        return Err(SvError::new(SvErrorKind::Internal)
            .with_op("walk")
            .with_path(path.display().to_string())
            .with_message("empty relative path"));
    }

    Ok(segments.join("/"))
}
