//! Snapshot command
//!
//! Usage:
//!   snapvault snapshot --target-directory <PATH> [--db-path <PATH>]

use clap::Args;
use snapvault_core::{DirWalker, EngineConfig};
use snapvault_store::{ops, Store};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Directory to capture
    #[arg(long = "target-directory", value_name = "PATH")]
    pub target_directory: PathBuf,

    /// Database path
    #[arg(long = "db-path", value_name = "PATH", default_value = "./backups.db")]
    pub db_path: PathBuf,

    /// Continue past unreadable files, reporting them as warnings
    #[arg(long)]
    pub skip_unreadable: bool,
}

/// Execute snapshot command
pub fn execute(args: SnapshotArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        skip_unreadable: args.skip_unreadable,
        ..EngineConfig::default()
    };
    let mut store = Store::open(&args.db_path)?;
    let walker = DirWalker::new(&config);

    let outcome = ops::snapshot(&mut store, &walker, &config, &args.target_directory)?;

    println!("Snapshot {} created", outcome.snapshot_id);
    for skipped in &outcome.skipped {
        eprintln!(
            "warning: [{}] skipped {}",
            skipped.reason.code(),
            skipped.relative_path
        );
    }

    Ok(())
}
