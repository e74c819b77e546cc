//! Version lookup layer
//!
//! Resolves the latest published version of a crate from a remote registry.
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for fetching versions from remote sources
//! - [`registries`]: Concrete registry implementations (crates.io)
//! - [`error`]: Error types for registry operations

pub mod error;
pub mod registries;
pub mod registry;
