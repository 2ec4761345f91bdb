//! Pail — Scoop bucket manifest synchronizer CLI.
//!
//! # Usage
//!
//! ```text
//! pail sync [--root <dir>] [--token <token>] [--dry-run] [--verify] [--json]
//! pail status [--root <dir>] [--json]
//! pail readme [--root <dir>] [--dry-run]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{readme::ReadmeArgs, status::StatusArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pail",
    version,
    about = "Keep Scoop bucket manifests in sync with upstream GitHub releases",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check upstream releases and update every tracked manifest.
    Sync(SyncArgs),

    /// Show version and hash state for every manifest in the bucket.
    Status(StatusArgs),

    /// Regenerate the README package-list region from the bucket contents.
    Readme(ReadmeArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Readme(args) => args.run(),
    }
}
