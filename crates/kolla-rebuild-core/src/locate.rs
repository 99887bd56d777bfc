//! Locating the project top directory and the default package version.

use std::path::{Path, PathBuf};
use std::time::Duration;

use kolla_rebuild_common::constants::{
    DATA_DIR, FALLBACK_SP_OSI_VERSION, INSTALL_SCRIPT, MAX_TOPDIR_DEPTH, SP_OSI_INDEX_URL,
};
use kolla_rebuild_common::error::{RebuildError, Result};
use serde::Deserialize;

use crate::version::is_valid_version;

/// Walks upward from the current working directory looking for the project
/// top directory.
///
/// # Errors
///
/// Returns `RebuildError::TopdirNotFound` if no directory within
/// `MAX_TOPDIR_DEPTH` parent levels contains the data-directory marker, and
/// `RebuildError::Io` if the current directory cannot be determined.
pub fn find_topdir() -> Result<PathBuf> {
    let start = std::env::current_dir().map_err(|e| RebuildError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    find_topdir_from(&start)
}

/// Walks upward from `start` looking for a directory that contains the
/// `kolla/` data directory with its install script inside.
///
/// # Errors
///
/// Returns `RebuildError::TopdirNotFound` if the marker is not found within
/// `MAX_TOPDIR_DEPTH` parent levels.
pub fn find_topdir_from(start: &Path) -> Result<PathBuf> {
    let mut dir = start;
    for _ in 0..=MAX_TOPDIR_DEPTH {
        if dir.join(DATA_DIR).join(INSTALL_SCRIPT).is_file() {
            tracing::debug!(topdir = %dir.display(), "found the project top directory");
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    Err(RebuildError::TopdirNotFound {
        marker: format!("{DATA_DIR}/{INSTALL_SCRIPT}"),
    })
}

#[derive(Debug, Deserialize)]
struct PackageMetadata {
    info: PackageInfo,
}

#[derive(Debug, Deserialize)]
struct PackageInfo {
    version: String,
}

/// Asks a package-index JSON endpoint for the latest published version.
///
/// # Errors
///
/// Returns `RebuildError::VersionLookup` on any network, HTTP, or parse
/// failure, or if the reported version does not look like a released
/// package version. Callers recover via the fallback constant.
pub fn query_package_index(url: &str) -> Result<String> {
    let lookup = |message: String| RebuildError::VersionLookup { message };

    let client = reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| lookup(format!("could not build the HTTP client: {e}")))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| lookup(format!("could not query {url}: {e}")))?;
    if !response.status().is_success() {
        return Err(lookup(format!("HTTP {} from {url}", response.status())));
    }
    let body = response
        .text()
        .map_err(|e| lookup(format!("could not read the response from {url}: {e}")))?;
    let metadata: PackageMetadata = serde_json::from_str(&body)
        .map_err(|e| lookup(format!("could not parse the metadata from {url}: {e}")))?;

    let version = metadata.info.version;
    if !is_valid_version(&version) {
        return Err(lookup(format!("{url} reported a malformed version {version:?}")));
    }
    Ok(version)
}

/// Resolves the integration package version from a package-index endpoint,
/// falling back to [`FALLBACK_SP_OSI_VERSION`] on any failure.
///
/// Lookup failures are never fatal; the run proceeds with the fallback so
/// that offline rebuilds keep working.
#[must_use]
pub fn resolve_version(url: &str) -> String {
    match query_package_index(url) {
        Ok(version) => {
            tracing::debug!(%version, "resolved the integration package version from the index");
            version
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                fallback = FALLBACK_SP_OSI_VERSION,
                "version lookup failed, using the fallback version"
            );
            FALLBACK_SP_OSI_VERSION.to_string()
        }
    }
}

/// Determines the default integration package version to build with.
#[must_use]
pub fn find_sp_osi_version() -> String {
    resolve_version(SP_OSI_INDEX_URL)
}
