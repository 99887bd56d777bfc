//! Unified error types for the kolla-rebuild workspace.
//!
//! Fatal conditions carry enough context (paths, names, the allowed set)
//! for the CLI to report them verbatim and exit.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum RebuildError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The project top directory could not be located.
    #[error("could not find a directory containing {marker} above the current directory")]
    TopdirNotFound {
        /// Relative marker path the walk-up search was looking for.
        marker: String,
    },

    /// The requested OpenStack release is not in the supported set.
    #[error("unsupported release {name:?}, must be one of {allowed}")]
    UnknownRelease {
        /// The release name as given by the user.
        name: String,
        /// Space-separated list of the supported release names.
        allowed: String,
    },

    /// The requested component is not in the known set.
    #[error("unrecognized component {name:?}, must be one or more of {allowed}")]
    UnknownComponent {
        /// The component name as given by the user.
        name: String,
        /// Space-separated list of the known component names.
        allowed: String,
    },

    /// A component name did not split into a project and a service.
    #[error("internal error: component {name:?} does not split into project and service")]
    InvalidComponent {
        /// The offending component name.
        name: String,
    },

    /// A version string does not have the dotted-numeric package shape.
    #[error("invalid integration package version {value:?}")]
    InvalidVersion {
        /// The offending version string.
        value: String,
    },

    /// A required data file is absent from the build context.
    #[error("required data file not found: {path}")]
    MissingFile {
        /// Path of the missing file.
        path: PathBuf,
    },

    /// A staged data file does not match its declared digest.
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Path of the corrupt file.
        path: PathBuf,
        /// Digest declared in the checksum manifest.
        expected: String,
        /// Digest computed from the file contents.
        actual: String,
    },

    /// The checksum manifest could not be read or understood.
    #[error("could not parse the checksum manifest {path}: {message}")]
    Manifest {
        /// Path of the manifest file.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// No Dockerfile template exists for the release/component pair.
    #[error("no Dockerfile template for release {release} component {component}")]
    UnsupportedRelease {
        /// The requested release name.
        release: String,
        /// The requested component name.
        component: String,
    },

    /// The package-index version lookup failed; always recovered via the
    /// fallback version, never surfaced to the user as an error.
    #[error("package index lookup failed: {message}")]
    VersionLookup {
        /// Description of the lookup failure.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RebuildError>;
