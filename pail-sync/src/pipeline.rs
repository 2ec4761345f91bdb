//! The per-package synchronization driver.
//!
//! Per package: load manifest → fetch releases → resolve release → compare
//! versions → (if newer) select asset → write version + URL with a cleared
//! hash → then, independently, whenever the stored hash is empty, download
//! the current URL, hash it, and write the digest back (hash repair).
//!
//! Every per-package error is caught at the driver boundary, classified into
//! that package's [`SyncOutcome`], and logged; it never stops processing of
//! subsequent packages. Packages are processed sequentially; the only shared
//! state is the append-only run summary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use pail_core::types::AppName;
use pail_core::{config, ConfigError, Manifest, TrackingEntry};
use pail_forge::client::{DEFAULT_API_BASE, DEFAULT_RELEASE_TIMEOUT, DEFAULT_USER_AGENT};
use pail_forge::resolve::{clean_version_tag, is_newer, resolve_release};
use pail_forge::{select_asset, ForgeConfig, ReleaseClient, ResolveOptions};

use crate::download;
use crate::error::{io_err, SyncError};
use crate::hash;
use crate::readme::{self, ReadmeOutcome};

/// Timeout for streaming one artifact to disk.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Explicit run configuration with documented defaults — no module-level
/// mutable state, no implicit environment reads inside the pipeline.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Repository root holding the configuration, bucket, and README.
    pub root: PathBuf,
    /// Tracking configuration file name, relative to `root`.
    pub config_file: String,
    /// Manifest directory name, relative to `root`.
    pub bucket_dir: String,
    /// README file name, relative to `root`.
    pub readme_file: String,
    /// Optional forge credential; absence means unauthenticated access.
    pub token: Option<String>,
    /// Forge API base URL (tests point this at a loopback stub).
    pub api_base: String,
    /// Timeout for a release-listing request.
    pub release_timeout: Duration,
    /// Timeout for one artifact download.
    pub download_timeout: Duration,
    /// User-Agent for both API and artifact requests.
    pub user_agent: String,
    /// Run-level tag-cleaning behavior.
    pub resolve: ResolveOptions,
    /// Re-download and re-hash even when a manifest already stores a hash,
    /// repairing stale digests at the cost of one download per package.
    pub verify_hashes: bool,
    /// Decide and report without downloading or writing anything.
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_file: config::CONFIG_FILE_NAME.to_owned(),
            bucket_dir: config::BUCKET_DIR_NAME.to_owned(),
            readme_file: config::README_FILE_NAME.to_owned(),
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            release_timeout: DEFAULT_RELEASE_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            resolve: ResolveOptions::default(),
            verify_hashes: false,
            dry_run: false,
        }
    }

    fn config_path(&self) -> PathBuf {
        self.root.join(&self.config_file)
    }

    fn bucket_path(&self) -> PathBuf {
        self.root.join(&self.bucket_dir)
    }

    fn readme_path(&self) -> PathBuf {
        self.root.join(&self.readme_file)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Per-package result of one synchronization cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SyncOutcome {
    /// Upstream is not newer and the stored hash is present.
    NoChange,
    /// Version and URL rewritten as one unit. `hash` carries the repaired
    /// digest when the follow-up download succeeded in the same cycle, and
    /// stays `None` (field cleared on disk, pending repair) when it did not.
    VersionUpdated {
        version: String,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hash: Option<String>,
    },
    /// Dry-run mode: the manifest *would* have been updated.
    WouldUpdate { version: String, url: String },
    /// Same version and URL; missing hash recomputed and written.
    HashRepaired { hash: String },
    /// Dry-run mode: the hash *would* have been recomputed.
    WouldRepair,
    /// Missing required inputs — no manifest, no URL field, no qualifying
    /// release, or no asset matching the keywords.
    Skipped { reason: String },
    /// Network, parse, or I/O error; manifest left as it was.
    Failed { error: String },
}

/// One package's report in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct AppReport {
    pub name: AppName,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

/// Append-only aggregate across all packages; reporting only, never gates
/// subsequent packages.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub reports: Vec<AppReport>,
    pub readme: ReadmeOutcome,
}

impl RunSummary {
    pub fn updated(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                SyncOutcome::VersionUpdated { .. } | SyncOutcome::WouldUpdate { .. }
            )
        })
    }

    pub fn repaired(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::HashRepaired { .. } | SyncOutcome::WouldRepair))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::NoChange))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SyncOutcome::Failed { .. }))
    }

    pub fn has_changes(&self) -> bool {
        self.updated() + self.repaired() > 0 || self.readme == ReadmeOutcome::Updated
    }

    fn count(&self, pred: impl Fn(&SyncOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run the full pipeline for every tracked package, then refresh the README
/// package-list region.
///
/// Fatal preconditions (missing/malformed configuration, missing bucket
/// directory) return `Err` before any package work; per-package errors are
/// absorbed into the summary.
pub fn run(options: &SyncOptions) -> Result<RunSummary, SyncError> {
    let started_at = Utc::now();

    let entries = config::load_entries(&options.config_path())?;
    let bucket = options.bucket_path();
    if !bucket.is_dir() {
        return Err(ConfigError::BucketDirMissing { path: bucket }.into());
    }

    let client = ReleaseClient::new(ForgeConfig {
        api_base: options.api_base.clone(),
        token: options.token.clone(),
        timeout: options.release_timeout,
        user_agent: options.user_agent.clone(),
    });
    let downloader = ureq::AgentBuilder::new()
        .timeout(options.download_timeout)
        .build();

    let mut reports = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name = entry.app_name();
        let outcome = match sync_entry(entry, &bucket, &client, &downloader, options) {
            Ok(outcome) => outcome,
            Err(e) => SyncOutcome::Failed {
                error: e.to_string(),
            },
        };
        log_outcome(&name, &outcome);
        reports.push(AppReport { name, outcome });
    }

    let list = readme::app_list(reports.iter().map(|r| r.name.clone()));
    let readme = match readme::update_readme(&options.readme_path(), &list, options.dry_run) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("README refresh failed: {e}");
            ReadmeOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    Ok(RunSummary {
        started_at,
        reports,
        readme,
    })
}

// ---------------------------------------------------------------------------
// Per-package cycle
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum UpdateResult {
    Updated { version: String, url: String },
    WouldUpdate { version: String, url: String },
    NotNewer,
    NoRelease,
    NoAsset,
    NoUrlField,
}

#[derive(Debug)]
enum RepairResult {
    Repaired { hash: String },
    WouldRepair,
    NotNeeded,
    NoUrl,
}

fn sync_entry(
    entry: &TrackingEntry,
    bucket: &Path,
    client: &ReleaseClient,
    downloader: &ureq::Agent,
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    let manifest_path = bucket.join(&entry.manifest_file);
    if !manifest_path.exists() {
        return Ok(SyncOutcome::Skipped {
            reason: format!("manifest file '{}' not found", entry.manifest_file),
        });
    }
    let mut manifest = Manifest::load(&manifest_path)?;

    let update = update_phase(entry, &manifest_path, &mut manifest, client, options)?;

    // The repair leg runs regardless of how the update phase went: a version
    // update just cleared the hash, and a manifest that was already current
    // may still carry an empty one. A repair failure right after a
    // successful version write is logged but keeps the update outcome; the
    // hash stays cleared on disk and the next run repairs it.
    let version_was_written = matches!(update, UpdateResult::Updated { .. });
    let repair = match repair_phase(&manifest_path, &mut manifest, downloader, options) {
        Ok(result) => result,
        Err(e) if version_was_written => {
            tracing::warn!(
                "{}: hash repair after version update failed: {e}",
                entry.app_name()
            );
            RepairResult::NotNeeded
        }
        Err(e) => return Err(e),
    };

    Ok(merge_outcomes(entry, update, repair))
}

fn update_phase(
    entry: &TrackingEntry,
    manifest_path: &Path,
    manifest: &mut Manifest,
    client: &ReleaseClient,
    options: &SyncOptions,
) -> Result<UpdateResult, SyncError> {
    let current_version = manifest.version().to_owned();
    let releases = client.releases(&entry.repo)?;

    let Some(release) = resolve_release(&releases, entry.allow_prerelease) else {
        return Ok(UpdateResult::NoRelease);
    };
    let candidate =
        clean_version_tag(&release.tag_name, &entry.version_strip_prefix, &options.resolve)?;
    tracing::debug!(
        "{}: manifest {current_version}, upstream tag {} -> {candidate}",
        entry.app_name(),
        release.tag_name
    );
    if !is_newer(&candidate, &current_version)? {
        return Ok(UpdateResult::NotNewer);
    }

    let Some(asset) = select_asset(&release.assets, &entry.asset_keywords) else {
        return Ok(UpdateResult::NoAsset);
    };
    let url = asset.browser_download_url.clone();

    // Version and URL move as one unit; a manifest without a URL field is
    // never given one, and dry-run reports the same skip a real run would.
    if manifest.url_and_hash().is_none() {
        return Ok(UpdateResult::NoUrlField);
    }
    if options.dry_run {
        return Ok(UpdateResult::WouldUpdate {
            version: candidate,
            url,
        });
    }
    if manifest.apply_release(&candidate, &url).is_none() {
        return Ok(UpdateResult::NoUrlField);
    }
    manifest.save(manifest_path)?;
    Ok(UpdateResult::Updated {
        version: candidate,
        url,
    })
}

fn repair_phase(
    manifest_path: &Path,
    manifest: &mut Manifest,
    downloader: &ureq::Agent,
    options: &SyncOptions,
) -> Result<RepairResult, SyncError> {
    let Some((url, stored_hash, _)) = manifest.url_and_hash() else {
        return Ok(RepairResult::NoUrl);
    };
    if !stored_hash.is_empty() && !options.verify_hashes {
        return Ok(RepairResult::NotNeeded);
    }
    if options.dry_run {
        return Ok(if stored_hash.is_empty() {
            RepairResult::WouldRepair
        } else {
            RepairResult::NotNeeded
        });
    }

    // Scoped scratch directory: removed on every exit path when dropped.
    let scratch = tempfile::Builder::new()
        .prefix("pail-download-")
        .tempdir()
        .map_err(|e| io_err(std::env::temp_dir(), e))?;
    let dest = scratch.path().join(download::safe_filename(&url));
    download::download_to(downloader, &options.user_agent, &url, &dest)?;
    let digest = hash::sha256_file(&dest)?;
    drop(scratch);

    if digest == stored_hash {
        return Ok(RepairResult::NotNeeded);
    }
    manifest.set_hash(&digest);
    manifest.save(manifest_path)?;
    Ok(RepairResult::Repaired { hash: digest })
}

/// Collapse the two phases into one reported outcome.
///
/// Precedence: a version update wins (carrying its repair result), then a
/// hash repair, then the update phase's skip/no-change classification.
fn merge_outcomes(
    entry: &TrackingEntry,
    update: UpdateResult,
    repair: RepairResult,
) -> SyncOutcome {
    match update {
        UpdateResult::Updated { version, url } => {
            let hash = match repair {
                RepairResult::Repaired { hash } => Some(hash),
                _ => None,
            };
            SyncOutcome::VersionUpdated { version, url, hash }
        }
        UpdateResult::WouldUpdate { version, url } => {
            SyncOutcome::WouldUpdate { version, url }
        }
        UpdateResult::NotNewer | UpdateResult::NoRelease | UpdateResult::NoAsset => match repair {
            RepairResult::Repaired { hash } => SyncOutcome::HashRepaired { hash },
            RepairResult::WouldRepair => SyncOutcome::WouldRepair,
            RepairResult::NotNeeded | RepairResult::NoUrl => match update {
                UpdateResult::NoRelease => SyncOutcome::Skipped {
                    reason: "no qualifying release".to_owned(),
                },
                UpdateResult::NoAsset => SyncOutcome::Skipped {
                    reason: format!(
                        "no asset matching keywords {:?}",
                        entry.asset_keywords
                    ),
                },
                _ => SyncOutcome::NoChange,
            },
        },
        UpdateResult::NoUrlField => SyncOutcome::Skipped {
            reason: "manifest has no url field".to_owned(),
        },
    }
}

fn log_outcome(name: &AppName, outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::NoChange => tracing::info!("{name}: up to date"),
        SyncOutcome::VersionUpdated { version, hash, .. } => match hash {
            Some(_) => tracing::info!("{name}: updated to {version}, hash repaired"),
            None => tracing::info!("{name}: updated to {version}, hash pending repair"),
        },
        SyncOutcome::WouldUpdate { version, .. } => {
            tracing::info!("[dry-run] {name}: would update to {version}")
        }
        SyncOutcome::HashRepaired { .. } => tracing::info!("{name}: hash repaired"),
        SyncOutcome::WouldRepair => tracing::info!("[dry-run] {name}: would repair hash"),
        SyncOutcome::Skipped { reason } => tracing::info!("{name}: skipped ({reason})"),
        SyncOutcome::Failed { error } => tracing::warn!("{name}: failed ({error})"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
