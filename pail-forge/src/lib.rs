//! # pail-forge
//!
//! GitHub release source, version resolution, and asset selection.
//!
//! [`ReleaseClient`] lists a repository's releases newest-first; [`resolve`]
//! decides which release applies and derives a comparable version from its
//! tag; [`assets`] picks the downloadable artifact by keyword match.

pub mod assets;
pub mod client;
pub mod error;
pub mod resolve;
pub mod types;

pub use assets::select_asset;
pub use client::{ForgeConfig, ReleaseClient};
pub use error::ForgeError;
pub use resolve::{
    clean_version_tag, is_newer, parse_version_lenient, resolve_release, LooseVersion,
    ResolveOptions,
};
pub use types::{Release, ReleaseAsset};
