//! Pail core library — tracking configuration, manifest store, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and the tracking-entry struct
//! - [`error`] — [`ConfigError`], [`ManifestError`]
//! - [`config`] — tracking configuration + bucket directory scanning
//! - [`manifest`] — two-layout manifest store with atomic saves

pub mod config;
pub mod error;
pub mod manifest;
pub mod types;

pub use error::{ConfigError, ManifestError};
pub use manifest::{HashLayout, Manifest};
pub use types::{AppName, RepoSlug, TrackingEntry};
