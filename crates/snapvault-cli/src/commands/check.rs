//! Check command
//!
//! Usage:
//!   snapvault check [--db-path <PATH>] [--json] [--structural]
//!
//! Exits non-zero when any content row fails verification or any file
//! reference is dangling.

use clap::Args;
use snapvault_core::{SvError, SvErrorKind};
use snapvault_store::{ops, Store};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Database path
    #[arg(long = "db-path", value_name = "PATH", default_value = "./backups.db")]
    pub db_path: PathBuf,

    /// Emit the report as JSON instead of lines
    #[arg(long)]
    pub json: bool,

    /// Also run the substrate-level structural check
    #[arg(long)]
    pub structural: bool,
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(&args.db_path)?;

    if args.structural {
        store.integrity_check()?;
    }

    let report = ops::check(&store)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_healthy() {
        println!("Store is healthy");
    } else {
        for hash in &report.corrupt_hashes {
            println!("corrupt: {}", hash);
        }
        for hash in &report.missing_hashes {
            println!("missing: {}", hash);
        }
    }

    if !report.is_healthy() {
        let kind = if report.corrupt_hashes.is_empty() {
            SvErrorKind::MissingContent
        } else {
            SvErrorKind::CorruptContent
        };
        return Err(Box::new(SvError::new(kind).with_op("check").with_message(
            format!(
                "store is unhealthy: {} corrupt, {} missing",
                report.corrupt_hashes.len(),
                report.missing_hashes.len()
            ),
        )));
    }

    Ok(())
}
