//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (DependencyEntry, DependencyTable, file name matching)
//! - cargo_toml.rs: Cargo.toml parser

pub mod cargo_toml;
pub mod traits;
pub mod types;

pub use cargo_toml::CargoTomlParser;
pub use traits::{ParseError, Parser};
pub use types::{DependencyEntry, DependencyTable, FileNameMatch};
