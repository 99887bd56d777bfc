//! Runtime configuration for a single rebuild invocation.

use std::path::PathBuf;

use crate::constants;
use crate::types::Release;

/// Resolved run parameters, built once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// The project top-level directory.
    pub topdir: PathBuf,
    /// The OpenStack release to rebuild the containers for.
    pub release: Release,
    /// The resolved integration package version; never empty.
    pub sp_osi_version: String,
    /// Whether diagnostic output was requested.
    pub verbose: bool,
}

impl Config {
    /// Returns the build-context data directory under the top directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.topdir.join(constants::DATA_DIR)
    }
}
