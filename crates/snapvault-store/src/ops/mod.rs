//! Engine operations
//!
//! The five externally observable behaviours: snapshot, list, restore,
//! prune, check. State-changing operations run in one transaction each;
//! list and check are read-only scans.

pub mod check;
pub mod list;
pub mod prune;
pub mod restore;
pub mod snapshot;

pub use check::{check, CheckReport};
pub use list::{list, ListReport, SnapshotListRow};
pub use prune::prune;
pub use restore::restore;
pub use snapshot::{snapshot, SkipReason, SkippedFile, SnapshotOutcome};
