//! Snapvault CLI
//!
//! Command-line interface for the snapvault backup engine

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "snapvault")]
#[command(about = "Content-addressed incremental backup tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Capture a snapshot of a directory
    Snapshot(commands::snapshot::SnapshotArgs),
    /// List snapshots with disk usage metrics
    List(commands::list::ListArgs),
    /// Restore a snapshot into a directory
    Restore(commands::restore::RestoreArgs),
    /// Remove a snapshot and reclaim unreferenced content
    Prune(commands::prune::PruneArgs),
    /// Verify stored content against recorded hashes
    Check(commands::check::CheckArgs),
}

fn main() {
    snapvault_core::logging::init(snapvault_core::logging::LogFormat::from_env());

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Snapshot(args) => commands::snapshot::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Restore(args) => commands::restore::execute(args),
        Commands::Prune(args) => commands::prune::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
