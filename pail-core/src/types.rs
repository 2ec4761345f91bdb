//! Domain types for the pail tracking configuration.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Configuration types deserialize from `apps_config.json` via serde.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed package name, derived from a manifest file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppName(pub String);

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AppName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// An `owner/name` pair identifying an upstream forge repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoSlug {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRepo {
            value: s.to_owned(),
        };
        let (owner, name) = s.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

impl TryFrom<String> for RepoSlug {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RepoSlug> for String {
    fn from(slug: RepoSlug) -> Self {
        slug.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tracking entry
// ---------------------------------------------------------------------------

/// One package tracking entry from `apps_config.json`.
///
/// Field names match the configuration file. Entries are read once per run
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEntry {
    /// Manifest file name inside the bucket directory, e.g. `ripgrep.json`.
    pub manifest_file: String,
    /// Upstream repository to poll for releases.
    pub repo: RepoSlug,
    /// Case-insensitive substrings the release asset filename must contain.
    #[serde(default)]
    pub asset_keywords: Vec<String>,
    /// Prefix stripped from release tags before version comparison (often `"v"`).
    #[serde(default)]
    pub version_strip_prefix: String,
    /// Whether prerelease entries qualify as the latest release.
    #[serde(default)]
    pub allow_prerelease: bool,
}

impl TrackingEntry {
    /// Package name shown in reports: the manifest file stem.
    pub fn app_name(&self) -> AppName {
        let stem = Path::new(&self.manifest_file)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.manifest_file.clone());
        AppName(stem)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(AppName::from("foo").to_string(), "foo");
    }

    #[test]
    fn repo_slug_parses_owner_and_name() {
        let slug: RepoSlug = "BurntSushi/ripgrep".parse().unwrap();
        assert_eq!(slug.owner, "BurntSushi");
        assert_eq!(slug.name, "ripgrep");
        assert_eq!(slug.to_string(), "BurntSushi/ripgrep");
    }

    #[test]
    fn repo_slug_rejects_malformed_values() {
        assert!("just-a-name".parse::<RepoSlug>().is_err());
        assert!("/name".parse::<RepoSlug>().is_err());
        assert!("owner/".parse::<RepoSlug>().is_err());
        assert!("a/b/c".parse::<RepoSlug>().is_err());
    }

    #[test]
    fn tracking_entry_defaults() {
        let entry: TrackingEntry = serde_json::from_str(
            r#"{"manifest_file": "app.json", "repo": "acme/app"}"#,
        )
        .unwrap();
        assert!(entry.asset_keywords.is_empty());
        assert_eq!(entry.version_strip_prefix, "");
        assert!(!entry.allow_prerelease);
        assert_eq!(entry.app_name().to_string(), "app");
    }

    #[test]
    fn tracking_entry_requires_manifest_and_repo() {
        let missing_repo: Result<TrackingEntry, _> =
            serde_json::from_str(r#"{"manifest_file": "app.json"}"#);
        assert!(missing_repo.is_err());

        let missing_manifest: Result<TrackingEntry, _> =
            serde_json::from_str(r#"{"repo": "acme/app"}"#);
        assert!(missing_manifest.is_err());
    }
}
