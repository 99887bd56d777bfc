//! SHA-256 digests of staged data files.

use std::fmt::Write as _;
use std::path::Path;

use kolla_rebuild_common::error::{RebuildError, Result};
use sha2::{Digest, Sha256};

/// Reads a file and returns the hex digest of its contents.
///
/// # Errors
///
/// Returns `RebuildError::Io` if the file cannot be read.
pub fn file_sha256(path: &Path) -> Result<String> {
    let contents = std::fs::read(path).map_err(|e| RebuildError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let digest = Sha256::digest(&contents);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail.
        let _ = write!(hex, "{byte:02x}");
    }
    Ok(hex)
}
