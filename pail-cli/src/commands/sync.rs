//! `pail sync` — run the release check and manifest update pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pail_sync::{pipeline, ReadmeOutcome, RunSummary, SyncOptions, SyncOutcome};

/// Arguments for `pail sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Bucket repository root (holds the config file, bucket/ and README.md).
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Tracking config file name, relative to the root.
    #[arg(long)]
    pub config: Option<String>,

    /// Manifest directory name, relative to the root.
    #[arg(long)]
    pub bucket: Option<String>,

    /// README file name, relative to the root.
    #[arg(long)]
    pub readme: Option<String>,

    /// GitHub API token (falls back to the GITHUB_TOKEN environment variable).
    #[arg(long)]
    pub token: Option<String>,

    /// Release API base URL, for GitHub Enterprise hosts.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Show what would change without writing any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Re-download and verify the hash of every manifest, not just empty ones.
    #[arg(long)]
    pub verify: bool,

    /// Emit the run summary as machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let mut options = SyncOptions::new(&self.root);
        if let Some(config) = self.config {
            options.config_file = config;
        }
        if let Some(bucket) = self.bucket {
            options.bucket_dir = bucket;
        }
        if let Some(readme) = self.readme {
            options.readme_file = readme;
        }
        if let Some(api_base) = self.api_base {
            options.api_base = api_base;
        }
        options.token = self.token.or_else(|| std::env::var("GITHUB_TOKEN").ok());
        options.verify_hashes = self.verify;
        options.dry_run = self.dry_run;

        let summary = pipeline::run(&options)
            .with_context(|| format!("sync failed for '{}'", self.root.display()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize summary")?
            );
            return Ok(());
        }

        print_summary(&summary, self.dry_run);
        Ok(())
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for report in &summary.reports {
        let name = report.name.to_string();
        match &report.outcome {
            SyncOutcome::VersionUpdated { version, hash, .. } => {
                let note = if hash.is_some() { "" } else { " (hash pending)" };
                println!("  {}  {name} -> {version}{note}", "↑".green().bold());
            }
            SyncOutcome::WouldUpdate { version, .. } => {
                println!("  {}  {name} -> {version}", "~".yellow().bold());
            }
            SyncOutcome::HashRepaired { .. } => {
                println!("  {}  {name} hash repaired", "✚".cyan().bold());
            }
            SyncOutcome::WouldRepair => {
                println!("  {}  {name} hash would be repaired", "~".yellow().bold());
            }
            SyncOutcome::NoChange => {
                println!("  {}  {name} up to date", "·".bright_black());
            }
            SyncOutcome::Skipped { reason } => {
                println!("  {}  {name} skipped: {reason}", "−".yellow());
            }
            SyncOutcome::Failed { error } => {
                println!("  {}  {name} failed: {error}", "✗".red().bold());
            }
        }
    }

    match &summary.readme {
        ReadmeOutcome::Updated => println!("  {}  README package list updated", "↑".green().bold()),
        ReadmeOutcome::WouldUpdate => {
            println!("  {}  README package list would be updated", "~".yellow().bold())
        }
        ReadmeOutcome::Unchanged => {}
        ReadmeOutcome::MarkersMissing => {
            println!("  {}  README markers missing, list not written", "−".yellow())
        }
        ReadmeOutcome::Missing => println!("  {}  README not found", "−".yellow()),
        ReadmeOutcome::Failed { error } => {
            println!("  {}  README refresh failed: {error}", "✗".red().bold())
        }
    }

    println!(
        "{prefix}✓ {} updated, {} repaired, {} unchanged, {} skipped, {} failed",
        summary.updated(),
        summary.repaired(),
        summary.unchanged(),
        summary.skipped(),
        summary.failed(),
    );
}
