//! Error types for pail-forge.

use thiserror::Error;

/// All errors that can arise from release queries and version resolution.
///
/// None of these are fatal for a run: the driver degrades the affected
/// package's outcome and moves on.
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The forge answered with a non-success status.
    #[error("release query to {url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    /// Connection, TLS, or timeout failure before a status was received.
    #[error("release query to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The response body could not be read or was not the expected JSON.
    #[error("malformed release listing from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Tag cleaning produced an empty version string.
    #[error("tag '{tag}' cleaned to an empty version string")]
    EmptyVersion { tag: String },

    /// A version string on either side of a comparison was unparsable.
    #[error("unparsable version string '{value}'")]
    VersionParse { value: String },
}
