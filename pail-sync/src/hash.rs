//! Streaming SHA-256 content hashing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// SHA-256 of a file's full byte content as a lowercase hex digest.
///
/// Reads incrementally; memory stays bounded regardless of artifact size.
pub fn sha256_file(path: &Path) -> Result<String, SyncError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
