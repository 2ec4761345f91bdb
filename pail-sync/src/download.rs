//! Artifact download into scoped temporary storage.
//!
//! Each package cycle downloads into its own [`tempfile::TempDir`], which is
//! removed on every exit path when it drops — no two packages ever observe
//! each other's temporary file.

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while streaming an artifact to disk. Per-package,
/// non-fatal: the driver degrades that package's outcome and continues.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The server answered with a non-success status.
    #[error("download from {url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    /// Connection, TLS, or timeout failure.
    #[error("download from {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Local filesystem failure while writing the artifact.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Stream the response body for `url` to `dest`.
///
/// The agent carries the download timeout; any non-success transport status
/// is an error. `dest`'s parent must already exist.
pub fn download_to(
    agent: &ureq::Agent,
    user_agent: &str,
    url: &str,
    dest: &Path,
) -> Result<(), DownloadError> {
    tracing::debug!("downloading {url} -> {}", dest.display());

    let response = agent
        .get(url)
        .set("User-Agent", user_agent)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => DownloadError::Status {
                url: url.to_owned(),
                code,
            },
            other => DownloadError::Transport {
                url: url.to_owned(),
                source: Box::new(other),
            },
        })?;

    let io_err = |source| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    };
    let mut reader = response.into_reader();
    let mut file = File::create(dest).map_err(io_err)?;
    std::io::copy(&mut reader, &mut file).map_err(io_err)?;
    Ok(())
}

/// Derive a filesystem-safe filename from a download URL.
///
/// Takes the path basename before any query string and replaces every
/// character outside `[A-Za-z0-9._-]` with `_`. Falls back to `"artifact"`
/// when nothing usable remains.
pub fn safe_filename(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let basename = without_query.rsplit('/').next().unwrap_or(without_query);
    let sanitized: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '_') {
        "artifact".to_owned()
    } else {
        sanitized
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
