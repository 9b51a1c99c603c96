//! Prune command
//!
//! Usage:
//!   snapvault prune --snapshot <N> [--db-path <PATH>]

use clap::Args;
use snapvault_store::{ops, Store};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Snapshot to remove
    #[arg(long = "snapshot", value_name = "N")]
    pub snapshot: i64,

    /// Database path
    #[arg(long = "db-path", value_name = "PATH", default_value = "./backups.db")]
    pub db_path: PathBuf,
}

/// Execute prune command
pub fn execute(args: PruneArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = Store::open(&args.db_path)?;
    ops::prune(&mut store, args.snapshot)?;

    println!("Snapshot {} pruned", args.snapshot);

    Ok(())
}
