//! `pail readme` — refresh the README package list without touching manifests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pail_core::{config, types::AppName};
use pail_sync::{readme, ReadmeOutcome};

/// Arguments for `pail readme`.
#[derive(Args, Debug)]
pub struct ReadmeArgs {
    /// Bucket repository root.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// README file name, relative to the root.
    #[arg(long)]
    pub readme: Option<String>,

    /// Show whether the list would change without writing the file.
    #[arg(long)]
    pub dry_run: bool,
}

impl ReadmeArgs {
    pub fn run(self) -> Result<()> {
        let bucket = self.root.join(config::BUCKET_DIR_NAME);
        let paths = config::list_manifest_paths(&bucket)
            .with_context(|| format!("failed to scan bucket at {}", bucket.display()))?;

        // The bucket directory is the source of truth here: every manifest
        // gets listed, tracked by the config or not.
        let names = readme::app_list(paths.iter().filter_map(|p| {
            p.file_stem()
                .map(|s| AppName(s.to_string_lossy().into_owned()))
        }));

        let readme_name = self.readme.as_deref().unwrap_or(config::README_FILE_NAME);
        let path = self.root.join(readme_name);
        let outcome = readme::update_readme(&path, &names, self.dry_run)
            .with_context(|| format!("failed to update {}", path.display()))?;

        match outcome {
            ReadmeOutcome::Updated => {
                println!("{} {} ({} packages)", "✓".green().bold(), path.display(), names.len())
            }
            ReadmeOutcome::WouldUpdate => {
                println!("[dry-run] would update {} ({} packages)", path.display(), names.len())
            }
            ReadmeOutcome::Unchanged => println!("{} already up to date", path.display()),
            ReadmeOutcome::MarkersMissing => anyhow::bail!(
                "package-list markers not found in {}",
                path.display()
            ),
            ReadmeOutcome::Missing => anyhow::bail!("README not found at {}", path.display()),
            ReadmeOutcome::Failed { error } => anyhow::bail!("README update failed: {error}"),
        }
        Ok(())
    }
}
