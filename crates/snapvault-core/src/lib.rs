//! Snapvault Core - Ambient kernel for the backup engine
//!
//! This crate provides the foundations shared by the store and CLI layers:
//! - Canonical structured error facility with a stable kind taxonomy
//! - SHA-256 digest helpers for content addressing
//! - Engine configuration passed explicitly through operation calls
//! - Logging setup (tracing) with env-selected text or JSON output
//! - Filesystem walk contract for snapshot sources

pub mod config;
pub mod digest;
pub mod errors;
pub mod logging;
pub mod walker;

// Re-export commonly used types
pub use config::EngineConfig;
pub use errors::{Result, SvError, SvErrorKind};
pub use walker::{DirWalker, SourceFile, Walker};
