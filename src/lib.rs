pub mod annotation;
pub mod check;
pub mod config;
pub mod logging;
pub mod lsp;
pub mod parser;
pub mod version;
