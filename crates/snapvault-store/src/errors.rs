//! Error helpers for snapvault-store
//!
//! Maps substrate failures into the canonical taxonomy

use snapvault_core::errors::{SvError, SvErrorKind};

/// Result type alias using SvError
pub use snapvault_core::errors::Result;

/// Map a rusqlite error into the canonical taxonomy
///
/// Constraint violations indicate a bug or external tampering and keep
/// their own kind; a file that is not a database is a schema problem;
/// everything else is a substrate failure.
pub fn from_rusqlite(err: rusqlite::Error) -> SvError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) => match e.code {
            rusqlite::ErrorCode::ConstraintViolation => SvErrorKind::Constraint,
            rusqlite::ErrorCode::NotADatabase => SvErrorKind::Schema,
            _ => SvErrorKind::StoreIo,
        },
        _ => SvErrorKind::StoreIo,
    };
    SvError::new(kind).with_op("sqlite").with_message(err.to_string())
}

/// Create a migration failure error
pub fn migration_error(migration_id: &str, reason: &str) -> SvError {
    SvError::new(SvErrorKind::Schema)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a schema incompatibility error detected at open
pub fn schema_incompatible(reason: impl Into<String>) -> SvError {
    SvError::new(SvErrorKind::Schema)
        .with_op("open")
        .with_message(reason)
}
