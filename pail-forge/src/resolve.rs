//! Release selection and tag-to-version resolution.
//!
//! Releases arrive newest-first; the resolver walks them in order and never
//! re-sorts. Version ordering is semver-aware — numeric segments compare
//! numerically, and a pre-release suffix sorts below the same bare version.
//! Any number of dot-separated numeric groups is accepted (`"1"`, `"1.2"`,
//! `"1.2.3.4"`); Windows application versions routinely carry four.

use std::cmp::Ordering;

use semver::Prerelease;

use crate::error::ForgeError;
use crate::types::Release;

/// Run-level resolver behavior (deliberately not per-package).
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Truncate a cleaned tag to the longest prefix matching the version
    /// token grammar `digits ('.' digits)* (('-'|'.') suffix)?`, dropping
    /// trailing noise such as `"1.2.3 (stable)"`.
    pub truncate_tag_noise: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            truncate_tag_noise: true,
        }
    }
}

/// Select the latest applicable release.
///
/// First non-prerelease entry wins unless `allow_prerelease`; when
/// `allow_prerelease` is set and no entry qualified, falls back to the first
/// release regardless of its prerelease flag. Empty input yields `None`.
pub fn resolve_release(releases: &[Release], allow_prerelease: bool) -> Option<&Release> {
    let picked = releases
        .iter()
        .find(|release| allow_prerelease || !release.prerelease);
    match picked {
        Some(release) => Some(release),
        None if allow_prerelease => releases.first(),
        None => None,
    }
}

/// Derive a comparable version string from a release tag.
///
/// Strips `strip_prefix` when the tag starts with it, trims whitespace, and
/// optionally truncates to the version token. An empty result is a hard
/// failure for the package's cycle.
pub fn clean_version_tag(
    tag: &str,
    strip_prefix: &str,
    options: &ResolveOptions,
) -> Result<String, ForgeError> {
    let mut cleaned = tag;
    if !strip_prefix.is_empty() {
        if let Some(rest) = cleaned.strip_prefix(strip_prefix) {
            cleaned = rest;
        }
    }
    let mut cleaned = cleaned.trim();
    if options.truncate_tag_noise {
        if let Some(token) = version_token(cleaned) {
            cleaned = token;
        }
    }
    if cleaned.is_empty() {
        return Err(ForgeError::EmptyVersion {
            tag: tag.to_owned(),
        });
    }
    Ok(cleaned.to_owned())
}

/// Longest prefix matching `digits ('.' digits)* (('-'|'.') suffix)?`.
///
/// `None` when the string does not start with a digit; the caller then keeps
/// the cleaned tag as-is and lets version parsing judge it.
fn version_token(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    // Additional dot-separated numeric groups.
    while end < bytes.len() && bytes[end] == b'.' {
        let group_start = end + 1;
        let mut cursor = group_start;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        if cursor == group_start {
            break;
        }
        end = cursor;
    }
    // A '-' or '.' delimited suffix swallows the rest of the string.
    if end + 1 < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'.') {
        end = bytes.len();
    }
    Some(&s[..end])
}

/// A version as the comparator sees it: dot-separated numeric segments of
/// any count, plus an optional pre-release suffix.
///
/// Missing trailing segments count as zero (`"1.2" == "1.2.0"`), so equality
/// and ordering go through [`Ord`], not field-by-field comparison.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    segments: Vec<u64>,
    pre: Option<Prerelease>,
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        // A suffix sorts below the same bare version; two suffixes follow
        // semver pre-release precedence.
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion {}

/// Parse a version leniently: any count of dot-separated numeric groups,
/// an optional `-suffix` pre-release, and ignored `+build` metadata.
pub fn parse_version_lenient(value: &str) -> Result<LooseVersion, ForgeError> {
    let parse_err = || ForgeError::VersionParse {
        value: value.to_owned(),
    };

    let without_build = value.split('+').next().unwrap_or(value);
    let (core, suffix) = match without_build.find('-') {
        Some(i) => (&without_build[..i], &without_build[i + 1..]),
        None => (without_build, ""),
    };

    let segments = core
        .split('.')
        .map(|group| group.parse().map_err(|_| parse_err()))
        .collect::<Result<Vec<u64>, _>>()?;

    let pre = if suffix.is_empty() {
        None
    } else {
        Some(Prerelease::new(suffix).map_err(|_| parse_err())?)
    };
    Ok(LooseVersion { segments, pre })
}

/// Whether `candidate` is strictly newer than `current` under semver-aware
/// ordering. Unparsable input on either side is a reported error, not a
/// crash — the driver degrades that package to `failed`.
pub fn is_newer(candidate: &str, current: &str) -> Result<bool, ForgeError> {
    let candidate = parse_version_lenient(candidate)?;
    let current = parse_version_lenient(current)?;
    Ok(candidate > current)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
