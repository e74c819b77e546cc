//! Common types for the manifest parser

/// Manifest file name recognized by the server
pub const MANIFEST_FILE_NAME: &str = "Cargo.toml";

/// Dependency table a manifest entry was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTable {
    /// `[dependencies]`
    Normal,
    /// `[dev-dependencies]`
    Dev,
    /// `[build-dependencies]`
    Build,
    /// `[workspace.dependencies]`
    Workspace,
}

impl DependencyTable {
    /// All recognized tables, in the order they are matched against table headers
    pub const ALL: [DependencyTable; 4] = [
        DependencyTable::Normal,
        DependencyTable::Dev,
        DependencyTable::Build,
        DependencyTable::Workspace,
    ];

    /// Returns the table name as written in the manifest header
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyTable::Normal => "dependencies",
            DependencyTable::Dev => "dev-dependencies",
            DependencyTable::Build => "build-dependencies",
            DependencyTable::Workspace => "workspace.dependencies",
        }
    }
}

impl std::str::FromStr for DependencyTable {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dependencies" => Ok(DependencyTable::Normal),
            "dev-dependencies" => Ok(DependencyTable::Dev),
            "build-dependencies" => Ok(DependencyTable::Build),
            "workspace.dependencies" => Ok(DependencyTable::Workspace),
            _ => Err(()),
        }
    }
}

/// How a document's file name is compared against [`MANIFEST_FILE_NAME`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileNameMatch {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

/// Check whether a document URI or path names a Cargo manifest
pub fn is_manifest(uri: &str, mode: FileNameMatch) -> bool {
    match mode {
        FileNameMatch::CaseSensitive => uri.ends_with(MANIFEST_FILE_NAME),
        FileNameMatch::CaseInsensitive => uri
            .to_lowercase()
            .ends_with(&MANIFEST_FILE_NAME.to_lowercase()),
    }
}

/// Strip one leading requirement operator (`^ ~ > = <`) and surrounding whitespace
///
/// Only the first operator character is removed, so `>=1.0` becomes `=1.0`.
pub fn normalize_version(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(['^', '~', '>', '=', '<'])
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// One dependency declared in a manifest with a version requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Crate name (e.g., "serde")
    pub name: String,
    /// Table the dependency was declared in
    pub table: DependencyTable,
    /// Version requirement exactly as written (e.g., "^1.0")
    pub declared_version_raw: String,
    /// Version requirement with the leading operator removed (e.g., "1.0")
    pub declared_version_normalized: String,
    /// Line holding the version string (0-indexed)
    pub line: usize,
    /// Length of that line in UTF-16 code units
    pub line_end: usize,
}

impl DependencyEntry {
    pub fn new(
        name: impl Into<String>,
        table: DependencyTable,
        declared_version_raw: impl Into<String>,
        line: usize,
        line_end: usize,
    ) -> Self {
        let declared_version_raw = declared_version_raw.into();
        Self {
            name: name.into(),
            table,
            declared_version_normalized: normalize_version(&declared_version_raw),
            declared_version_raw,
            line,
            line_end,
        }
    }
}
