//! Migration framework
//!
//! Provides:
//! - Migration runner with checksums and incompatibility detection
//! - Idempotent application
//! - Embedded SQL migrations

mod embedded;
mod runner;

pub use runner::apply_migrations;
