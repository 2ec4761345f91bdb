//! Error types for pail-sync.

use std::path::PathBuf;

use thiserror::Error;

use pail_core::error::{ConfigError, ManifestError};
use pail_forge::ForgeError;

/// All errors that can arise from a sync run.
///
/// [`SyncError::Config`] is fatal and aborts the run before any package
/// work; everything else is caught at the driver boundary and degrades a
/// single package's outcome.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Fatal precondition: configuration missing or malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Manifest parse or write failure.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Release query or version resolution failure.
    #[error("forge error: {0}")]
    Forge(#[from] ForgeError),

    /// Artifact download failure.
    #[error("download error: {0}")]
    Download(#[from] crate::download::DownloadError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
