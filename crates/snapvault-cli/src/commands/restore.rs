//! Restore command
//!
//! Usage:
//!   snapvault restore --snapshot-number <N> --output-directory <PATH> [--db-path <PATH>]

use clap::Args;
use snapvault_store::{ops, Store};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RestoreArgs {
    /// Snapshot to restore
    #[arg(long = "snapshot-number", value_name = "N")]
    pub snapshot_number: i64,

    /// Directory to restore into
    #[arg(long = "output-directory", value_name = "PATH")]
    pub output_directory: PathBuf,

    /// Database path
    #[arg(long = "db-path", value_name = "PATH", default_value = "./backups.db")]
    pub db_path: PathBuf,
}

/// Execute restore command
pub fn execute(args: RestoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(&args.db_path)?;
    ops::restore(&store, args.snapshot_number, &args.output_directory)?;

    println!(
        "Snapshot {} restored to {}",
        args.snapshot_number,
        args.output_directory.display()
    );

    Ok(())
}
