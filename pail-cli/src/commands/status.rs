//! `pail status` — bucket inventory and hash visibility.
//!
//! Reads only local files; no network calls. Every manifest in the bucket
//! gets a row, joined against the tracking config, plus a row for any
//! tracked entry whose manifest file is missing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pail_core::{config, HashLayout, Manifest};

/// Arguments for `pail status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Bucket repository root.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Tracking config file name, relative to the root.
    #[arg(long)]
    pub config: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let config_name = self.config.as_deref().unwrap_or(config::CONFIG_FILE_NAME);
        let report = build_report(&self.root, config_name)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(report);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Report model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum HashState {
    /// Hash field present and non-empty.
    Ok,
    /// Hash field present but empty, pending repair.
    Empty,
    /// Manifest has no recognized url field.
    NoUrl,
    /// Tracked entry without a manifest file on disk.
    Missing,
}

#[derive(Debug, Clone, Serialize)]
struct PackageStatus {
    app: String,
    version: Option<String>,
    repo: Option<String>,
    layout: Option<String>,
    hash: HashState,
}

#[derive(Serialize)]
struct StatusReport {
    summary: StatusSummary,
    packages: Vec<PackageStatus>,
}

#[derive(Serialize)]
struct StatusSummary {
    manifests: usize,
    tracked: usize,
    empty_hashes: usize,
    missing_manifests: usize,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "app")]
    app: String,
    #[tabled(rename = "version")]
    version: String,
    #[tabled(rename = "repo")]
    repo: String,
    #[tabled(rename = "layout")]
    layout: String,
    #[tabled(rename = "hash")]
    hash: String,
}

fn build_report(root: &Path, config_name: &str) -> Result<StatusReport> {
    let entries = config::load_entries(&root.join(config_name))
        .with_context(|| format!("failed to load {config_name}"))?;
    let bucket = root.join(config::BUCKET_DIR_NAME);
    let manifest_paths = config::list_manifest_paths(&bucket)
        .with_context(|| format!("failed to scan bucket at {}", bucket.display()))?;

    let tracked: BTreeMap<String, String> = entries
        .iter()
        .map(|e| (e.app_name().to_string(), e.repo.to_string()))
        .collect();

    let mut packages = Vec::with_capacity(manifest_paths.len());
    for path in &manifest_paths {
        let app = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let manifest = Manifest::load(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let (layout, hash) = match manifest.url_and_hash() {
            Some((_, hash, layout)) => {
                let state = if hash.is_empty() {
                    HashState::Empty
                } else {
                    HashState::Ok
                };
                (Some(layout), state)
            }
            None => (None, HashState::NoUrl),
        };
        packages.push(PackageStatus {
            repo: tracked.get(&app).cloned(),
            version: Some(manifest.version().to_string()),
            layout: layout.as_ref().map(HashLayout::to_string),
            app,
            hash,
        });
    }

    for entry in &entries {
        let app = entry.app_name().to_string();
        if packages.iter().any(|p| p.app == app) {
            continue;
        }
        packages.push(PackageStatus {
            app,
            version: None,
            repo: Some(entry.repo.to_string()),
            layout: None,
            hash: HashState::Missing,
        });
    }
    packages.sort_by(|a, b| a.app.cmp(&b.app));

    let manifests = manifest_paths.len();
    let empty_hashes = packages
        .iter()
        .filter(|p| p.hash == HashState::Empty)
        .count();
    let missing_manifests = packages
        .iter()
        .filter(|p| p.hash == HashState::Missing)
        .count();

    Ok(StatusReport {
        summary: StatusSummary {
            manifests,
            tracked: tracked.len(),
            empty_hashes,
            missing_manifests,
        },
        packages,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_table(report: StatusReport) {
    println!(
        "Pail v{} | {} manifests | {} tracked | {} empty hashes",
        env!("CARGO_PKG_VERSION"),
        report.summary.manifests,
        report.summary.tracked,
        report.summary.empty_hashes,
    );

    if report.packages.is_empty() {
        println!("No manifests in the bucket.");
        return;
    }

    let needs_attention = report.summary.empty_hashes + report.summary.missing_manifests;
    let rows: Vec<StatusTableRow> = report
        .packages
        .into_iter()
        .map(|p| StatusTableRow {
            app: p.app,
            version: p.version.unwrap_or_else(|| "-".to_string()),
            repo: p.repo.unwrap_or_else(|| "-".to_string()),
            layout: p.layout.unwrap_or_else(|| "-".to_string()),
            hash: hash_label(p.hash).to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if needs_attention > 0 {
        println!(
            "{}",
            "Run 'pail sync' to fill in missing hashes.".yellow()
        );
    }
}

fn hash_label(state: HashState) -> &'static str {
    match state {
        HashState::Ok => "ok",
        HashState::Empty => "empty",
        HashState::NoUrl => "no url",
        HashState::Missing => "missing",
    }
}
