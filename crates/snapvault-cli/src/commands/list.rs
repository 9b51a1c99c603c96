//! List command
//!
//! Usage:
//!   snapvault list [--db-path <PATH>] [--json]

use clap::Args;
use snapvault_store::{ops, Store};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Database path
    #[arg(long = "db-path", value_name = "PATH", default_value = "./backups.db")]
    pub db_path: PathBuf,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Execute list command
pub fn execute(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(&args.db_path)?;
    let report = ops::list(&store)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:>12} {:>14}",
        "SNAPSHOT", "TIMESTAMP", "SIZE", "DISTINCT_SIZE"
    );
    for row in &report.rows {
        println!(
            "{:<10} {:<20} {:>12} {:>14}",
            row.id, row.taken_at, row.size, row.distinct_size
        );
    }
    println!("{:<10} {:<20} {:>12}", "total", "", report.total_size);

    Ok(())
}
