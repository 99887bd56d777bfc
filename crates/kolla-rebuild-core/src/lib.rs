//! # kolla-rebuild-core
//!
//! The middle of the rebuild pipeline: locating the project top directory,
//! resolving the integration package version, staging and verifying the
//! build-context data files, and rendering the per-component Dockerfiles.
//! Everything here is a pure transform over [`Config`] and the filesystem;
//! the CLI crate owns argument parsing and the `docker build` invocation.
//!
//! [`Config`]: kolla_rebuild_common::config::Config

pub mod checksum;
pub mod dockerfile;
pub mod locate;
pub mod prepare;
pub mod version;
