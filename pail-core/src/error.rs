//! Error types for pail-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the run configuration. All of these are fatal
/// preconditions: the run must terminate before any package is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The tracking configuration file does not exist.
    #[error("tracking configuration not found at {path}")]
    NotFound { path: PathBuf },

    /// Underlying I/O failure while reading configuration.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed configuration JSON — includes file path and serde context.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The directory holding the tracked manifests does not exist.
    #[error("bucket directory not found at {path}")]
    BucketDirMissing { path: PathBuf },

    /// A `repo` value was not an `owner/name` pair.
    #[error("invalid repository slug '{value}'; expected 'owner/name'")]
    InvalidRepo { value: String },
}

/// Errors raised by the manifest store. These are per-package: the driver
/// records them and moves on to the next package.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed manifest JSON on load.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error on save.
    #[error("manifest serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`ManifestError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}
