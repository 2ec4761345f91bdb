//! Tracking configuration and bucket directory scanning.
//!
//! # Repository layout
//!
//! ```text
//! <root>/
//!   apps_config.json   (tracking entries — one per managed package)
//!   bucket/
//!     <app>.json       (one manifest per package)
//!   README.md          (carries the delimited package-list region)
//! ```
//!
//! A missing or malformed `apps_config.json`, or a missing bucket directory,
//! is a fatal precondition: nothing is processed.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::TrackingEntry;

/// Default tracking configuration file name at the repository root.
pub const CONFIG_FILE_NAME: &str = "apps_config.json";

/// Default directory holding the tracked manifests.
pub const BUCKET_DIR_NAME: &str = "bucket";

/// Default document carrying the package-list region.
pub const README_FILE_NAME: &str = "README.md";

/// Load all tracking entries from a configuration file.
///
/// Tolerates a UTF-8 byte-order mark; strict JSON otherwise. Returns
/// [`ConfigError::NotFound`] when the file is absent.
pub fn load_entries(path: &Path) -> Result<Vec<TrackingEntry>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
    serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// List all `*.json` manifest paths in the bucket directory, sorted by file
/// name for deterministic reporting.
pub fn list_manifest_paths(bucket_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !bucket_dir.is_dir() {
        return Err(ConfigError::BucketDirMissing {
            path: bucket_dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(bucket_dir).map_err(|e| ConfigError::Io {
        path: bucket_dir.to_path_buf(),
        source: e,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
