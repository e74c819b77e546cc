//! LSP (Language Server Protocol) implementation layer
//!
//! This module handles communication with editors via LSP and shows the
//! latest crates.io version of each dependency as an inlay hint.
//!
//! # Modules
//!
//! - [`backend`]: Main LSP backend implementing `LanguageServer` trait
//! - [`classifier`]: Decides what a single text edit means for the annotations
//! - [`document`]: Live text and annotations of an open document
//! - [`host`]: Rendering and user warnings on the editor side
//! - [`inlay_hints`]: Converts annotations into inlay hints
//! - [`orchestrator`]: Reacts to open, edit, save and the manual command
//! - [`server`]: LSP server initialization and lifecycle

pub mod backend;
pub mod classifier;
pub mod document;
pub mod host;
pub mod inlay_hints;
pub mod orchestrator;
pub mod server;
