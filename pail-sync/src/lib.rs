//! # pail-sync
//!
//! The manifest synchronization pipeline.
//!
//! Call [`pipeline::run`] with a [`SyncOptions`] to process every tracked
//! package: release discovery, version comparison, asset selection, the
//! version/URL/hash update transaction against each manifest, and the
//! README package-list refresh.

pub mod download;
pub mod error;
pub mod hash;
pub mod pipeline;
pub mod readme;

pub use error::SyncError;
pub use pipeline::{run, AppReport, RunSummary, SyncOptions, SyncOutcome};
pub use readme::ReadmeOutcome;
