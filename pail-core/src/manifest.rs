//! Two-layout package manifest store.
//!
//! A manifest is a UTF-8 JSON object holding, besides arbitrary other fields,
//! a `version` and a URL/hash pair in one of two shapes:
//!
//! ```text
//! root layout:          { "version": …, "url": …, "hash": …, … }
//! architecture layout:  { "version": …, "architecture": { "64bit": { "url": …, "hash": … } }, … }
//! ```
//!
//! The layout is resolved once at load time and every subsequent read or
//! write dispatches on it; the store never writes to a layout different from
//! the one the URL was read from. Saves rewrite the whole document through
//! an atomic `.tmp` + rename, preserving unknown fields and original key
//! order (`serde_json` with `preserve_order`).

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{io_err, ManifestError};

/// Version reported when a manifest carries no `version` field.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Which of the two supported field layouts a manifest uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashLayout {
    /// Top-level `url` / `hash`.
    Root,
    /// Nested `architecture."64bit".url` / `.hash`.
    Arch64,
}

impl std::fmt::Display for HashLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashLayout::Root => write!(f, "root"),
            HashLayout::Arch64 => write!(f, "64bit"),
        }
    }
}

/// In-memory parsed form of one package manifest.
///
/// Holds the full JSON object so unspecified fields survive a rewrite
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    data: Map<String, Value>,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// Tolerant of a UTF-8 byte-order mark; strict JSON otherwise. A
    /// non-object document is a parse error.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
        let data = serde_json::from_str(contents).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { data })
    }

    /// Build a manifest from an already-parsed JSON object.
    pub fn from_object(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// The manifest's current version, defaulting to [`DEFAULT_VERSION`].
    pub fn version(&self) -> &str {
        self.data
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_VERSION)
    }

    /// Current download URL, stored hash, and the layout they were read
    /// from. Architecture layout is probed first. `None` when no non-empty
    /// URL exists in either layout.
    pub fn url_and_hash(&self) -> Option<(String, String, HashLayout)> {
        if let Some(slot) = self.arch_slot() {
            if let Some(url) = non_empty_str(slot.get("url")) {
                let hash = str_or_empty(slot.get("hash"));
                return Some((url, hash, HashLayout::Arch64));
            }
        }
        if let Some(url) = non_empty_str(self.data.get("url")) {
            let hash = str_or_empty(self.data.get("hash"));
            return Some((url, hash, HashLayout::Root));
        }
        None
    }

    /// Set version and URL on the layout the URL was read from, clearing the
    /// hash to force a later repair pass. Returns the layout written, or
    /// `None` (nothing modified) when the manifest has no URL field.
    pub fn apply_release(&mut self, version: &str, url: &str) -> Option<HashLayout> {
        let (_, _, layout) = self.url_and_hash()?;
        self.data
            .insert("version".to_owned(), Value::String(version.to_owned()));
        let slot = self.slot_mut(layout)?;
        slot.insert("url".to_owned(), Value::String(url.to_owned()));
        slot.insert("hash".to_owned(), Value::String(String::new()));
        Some(layout)
    }

    /// Set the hash alone, on the same layout the URL resolves through.
    /// Returns the layout written, or `None` when the manifest has no URL.
    pub fn set_hash(&mut self, hash: &str) -> Option<HashLayout> {
        let (_, _, layout) = self.url_and_hash()?;
        let slot = self.slot_mut(layout)?;
        slot.insert("hash".to_owned(), Value::String(hash.to_owned()));
        Some(layout)
    }

    /// Serialize with 4-space indentation and a trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.data.serialize(&mut ser)?;
        buf.push(b'\n');
        // serde_json output is valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Save the manifest atomically: write `<path>.tmp`, then rename.
    ///
    /// A crash mid-write leaves the prior valid manifest intact.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_pretty_json()?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(path, e));
        }
        Ok(())
    }

    fn arch_slot(&self) -> Option<&Map<String, Value>> {
        self.data
            .get("architecture")?
            .get("64bit")?
            .as_object()
    }

    fn slot_mut(&mut self, layout: HashLayout) -> Option<&mut Map<String, Value>> {
        match layout {
            HashLayout::Root => Some(&mut self.data),
            HashLayout::Arch64 => self
                .data
                .get_mut("architecture")?
                .get_mut("64bit")?
                .as_object_mut(),
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn str_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
