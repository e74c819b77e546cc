use serde::Deserialize;
use std::path::PathBuf;

use crate::parser::types::FileNameMatch;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Default base URL of the crates.io web API
pub const DEFAULT_REGISTRY_URL: &str = "https://crates.io";

/// User agent sent with every registry request (crates.io rejects anonymous clients)
pub const USER_AGENT: &str = concat!("cargo-latest-version/", env!("CARGO_PKG_VERSION"));

/// Upper bound on registry lookups in flight during one scan
pub const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// Command that re-annotates the manifest given as first argument
pub const SHOW_LATEST_VERSIONS_COMMAND: &str = "cargoLatestVersion.showLatestVersions";

/// Environment variable holding the tracing filter directives
pub const LOG_ENV_VAR: &str = "CARGO_LATEST_VERSION_LOG";

const APP_NAME: &str = "cargo-latest-version";

/// LSP configuration structure, read from `initializationOptions`
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LspConfig {
    pub file_match: FileMatchConfig,
}

/// How the manifest file name is recognized for each trigger
///
/// Saves are matched case-insensitively by default while open, edit and the
/// manual command require the exact `Cargo.toml` spelling.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FileMatchConfig {
    pub open: FileNameMatch,
    pub edit: FileNameMatch,
    pub save: FileNameMatch,
}

impl Default for FileMatchConfig {
    fn default() -> Self {
        Self {
            open: FileNameMatch::CaseSensitive,
            edit: FileNameMatch::CaseSensitive,
            save: FileNameMatch::CaseInsensitive,
        }
    }
}

/// Returns the path to the data directory for cargo-latest-version.
/// Uses $XDG_DATA_HOME/cargo-latest-version if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/cargo-latest-version,
/// or ./cargo-latest-version if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{APP_NAME}.log"))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}
