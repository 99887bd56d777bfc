//! Staging and verification of the build-context data files.
//!
//! The data directory doubles as the `docker build` context. Its contents
//! are described by a checksum manifest (`checksums.json`) so a stale or
//! corrupt checkout fails here, before any container build starts.

use std::collections::BTreeMap;
use std::path::Path;

use kolla_rebuild_common::config::Config;
use kolla_rebuild_common::constants::{CHECKSUM_MANIFEST, INSTALL_SCRIPT};
use kolla_rebuild_common::error::{RebuildError, Result};
use kolla_rebuild_common::types::FileManifest;
use serde::Deserialize;

use crate::checksum::file_sha256;

#[derive(Debug, Deserialize)]
struct ChecksumManifest {
    format: ManifestFormat,
    files: BTreeMap<String, FileEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestFormat {
    version: FormatVersion,
}

#[derive(Debug, Deserialize)]
struct FormatVersion {
    major: u32,
    minor: u32,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    sha256: String,
}

fn read_manifest(path: &Path) -> Result<ChecksumManifest> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RebuildError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            RebuildError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let manifest: ChecksumManifest =
        serde_json::from_str(&contents).map_err(|e| RebuildError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let version = &manifest.format.version;
    tracing::debug!(major = version.major, minor = version.minor, "got manifest format");
    if version.major != 0 {
        return Err(RebuildError::Manifest {
            path: path.to_path_buf(),
            message: format!("unsupported format version {}", version.major),
        });
    }
    if !manifest.files.contains_key(INSTALL_SCRIPT) {
        return Err(RebuildError::Manifest {
            path: path.to_path_buf(),
            message: format!("the install script {INSTALL_SCRIPT} is not listed"),
        });
    }
    Ok(manifest)
}

/// Verifies the data directory contents and returns the staged files.
///
/// Every file listed in the checksum manifest must exist and match its
/// declared SHA-256 digest; the in-image install script must be among them.
///
/// # Errors
///
/// Returns `RebuildError::MissingFile` for an absent file,
/// `RebuildError::ChecksumMismatch` for a corrupt one, and
/// `RebuildError::Manifest` if the manifest itself is unreadable or does not
/// describe a usable build context.
pub fn prepare_data_files(cfg: &Config, datadir: &Path) -> Result<FileManifest> {
    tracing::debug!(
        datadir = %datadir.display(),
        release = %cfg.release,
        "preparing the build context"
    );
    let manifest = read_manifest(&datadir.join(CHECKSUM_MANIFEST))?;

    let mut files = FileManifest::new();
    for (name, entry) in &manifest.files {
        let path = datadir.join(name);
        if !path.is_file() {
            return Err(RebuildError::MissingFile { path });
        }
        let actual = file_sha256(&path)?;
        if actual != entry.sha256.to_lowercase() {
            return Err(RebuildError::ChecksumMismatch {
                path,
                expected: entry.sha256.clone(),
                actual,
            });
        }
        files.push(path, name.into());
    }
    tracing::debug!(count = files.len(), "staged the build context files");
    Ok(files)
}
