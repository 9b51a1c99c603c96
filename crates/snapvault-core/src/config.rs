//! Engine configuration
//!
//! No global state: a config value is built by the caller and passed
//! explicitly into the snapshot operation.

/// Default per-file size cap: files larger than this are skipped with a
/// warning because snapshotting reads each file fully into memory.
pub const DEFAULT_MAX_FILE_LEN: u64 = 1024 * 1024 * 1024;

/// Runtime configuration for snapshot capture
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Files whose on-disk length exceeds this are skipped, not stored
    pub max_file_len: u64,
    /// When true, unreadable files become warnings instead of aborting
    pub skip_unreadable: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_len: DEFAULT_MAX_FILE_LEN,
            skip_unreadable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cap_is_one_gib() {
        let config = EngineConfig::default();
        assert_eq!(config.max_file_len, 1024 * 1024 * 1024);
    }

    #[test]
    fn test_unreadable_files_fatal_by_default() {
        assert!(!EngineConfig::default().skip_unreadable);
    }
}
