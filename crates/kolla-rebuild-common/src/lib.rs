//! # kolla-rebuild-common
//!
//! Shared types, error definitions, configuration model, and constants
//! used across the kolla-rebuild workspace.
//!
//! This crate is the leaf of the dependency graph: it depends on no other
//! internal crate and provides the foundational primitives that the core
//! logic and the CLI build upon.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
