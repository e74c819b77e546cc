//! Cargo.toml parser

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{DependencyEntry, DependencyTable, FileNameMatch, is_manifest};
use tracing::warn;

/// Parser for Cargo.toml files
pub struct CargoTomlParser;

impl CargoTomlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CargoTomlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CargoTomlParser {
    fn can_parse(&self, uri: &str) -> bool {
        is_manifest(uri, FileNameMatch::CaseSensitive)
    }

    fn parse(&self, content: &str) -> Result<Vec<DependencyEntry>, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language = tree_sitter_toml_ng::LANGUAGE;
        parser.set_language(&language.into()).map_err(|e| {
            warn!("Failed to set TOML language for tree-sitter: {}", e);
            ParseError::TreeSitter(e.to_string())
        })?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            warn!("Failed to parse TOML content");
            ParseError::ParseFailed("Failed to parse TOML".to_string())
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error_position(root);
            return Err(ParseError::InvalidSyntax(format!(
                "malformed manifest near line {}",
                position.row + 1
            )));
        }

        let lines = LineLengths::new(content);
        let mut results = Vec::new();

        self.extract_dependencies(root, content, &lines, &mut results);

        Ok(results)
    }
}

/// UTF-16 length of every line, used as the anchor column of an annotation
struct LineLengths {
    lengths: Vec<usize>,
}

impl LineLengths {
    fn new(content: &str) -> Self {
        let lengths = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r').encode_utf16().count())
            .collect();
        Self { lengths }
    }

    fn get(&self, line: usize) -> usize {
        self.lengths.get(line).copied().unwrap_or(0)
    }
}

/// Locate the first ERROR or MISSING node for the log message
fn first_error_position(node: tree_sitter::Node) -> tree_sitter::Point {
    if node.is_error() || node.is_missing() {
        return node.start_position();
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_position(child);
        }
    }

    node.start_position()
}

/// Normalize a key as written (`serde . version`) to its dotted form (`serde.version`)
fn normalize_key(text: &str) -> String {
    text.split('.')
        .map(|part| part.trim().trim_matches('"'))
        .collect::<Vec<_>>()
        .join(".")
}

/// Strip the surrounding quotes of a basic or literal string
fn unquote(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'')
}

impl CargoTomlParser {
    /// Extract dependencies from all dependency tables
    fn extract_dependencies(
        &self,
        root: tree_sitter::Node,
        content: &str,
        lines: &LineLengths,
        results: &mut Vec<DependencyEntry>,
    ) {
        let mut cursor = root.walk();

        for child in root.children(&mut cursor) {
            if child.kind() == "table" {
                self.process_table(child, content, lines, results);
            }
        }
    }

    /// Read the header of a table node (e.g., `dependencies` for `[dependencies]`)
    fn table_name(table_node: tree_sitter::Node, content: &str) -> Option<String> {
        let mut cursor = table_node.walk();
        let key = table_node
            .children(&mut cursor)
            .find(|child| matches!(child.kind(), "bare_key" | "dotted_key" | "quoted_key"))?;
        Some(normalize_key(&content[key.byte_range()]))
    }

    /// Split a sub-table header like `dependencies.serde` into its table and crate name
    fn split_sub_table(name: &str) -> Option<(DependencyTable, &str)> {
        DependencyTable::ALL.iter().find_map(|table| {
            let rest = name.strip_prefix(table.as_str())?.strip_prefix('.')?;
            if rest.is_empty() || rest.contains('.') {
                None
            } else {
                Some((*table, rest))
            }
        })
    }

    /// Process a TOML table node
    fn process_table(
        &self,
        table_node: tree_sitter::Node,
        content: &str,
        lines: &LineLengths,
        results: &mut Vec<DependencyEntry>,
    ) {
        let Some(name) = Self::table_name(table_node, content) else {
            return;
        };

        if let Ok(table) = name.parse::<DependencyTable>() {
            let mut cursor = table_node.walk();
            for child in table_node.children(&mut cursor) {
                if child.kind() == "pair" {
                    self.extract_entry_from_pair(child, table, content, lines, results);
                }
            }
            return;
        }

        // [dependencies.serde]
        // version = "1.0"
        if let Some((table, crate_name)) = Self::split_sub_table(&name) {
            if let Some(version_node) = Self::find_version_string(table_node, content) {
                results.push(Self::make_entry(
                    crate_name,
                    table,
                    version_node,
                    content,
                    lines,
                ));
            }
        }
    }

    /// Extract a dependency entry from a key-value pair
    fn extract_entry_from_pair(
        &self,
        pair_node: tree_sitter::Node,
        table: DependencyTable,
        content: &str,
        lines: &LineLengths,
        results: &mut Vec<DependencyEntry>,
    ) {
        let mut cursor = pair_node.walk();
        let mut key: Option<String> = None;

        for child in pair_node.children(&mut cursor) {
            match child.kind() {
                "bare_key" | "dotted_key" => {
                    key = Some(normalize_key(&content[child.byte_range()]));
                }
                "string" => {
                    let Some(key) = key.as_deref() else {
                        continue;
                    };
                    // serde = "1.0" or serde.version = "1.0"; other dotted keys
                    // (serde.path, serde.git) carry no version
                    let name = match key.split_once('.') {
                        None => Some(key),
                        Some((name, "version")) => Some(name),
                        Some(_) => None,
                    };
                    if let Some(name) = name {
                        results.push(Self::make_entry(name, table, child, content, lines));
                    }
                }
                "inline_table" => {
                    let Some(key) = key.as_deref() else {
                        continue;
                    };
                    if key.contains('.') {
                        continue;
                    }
                    // serde = { version = "1.0", features = ["derive"] }
                    if let Some(version_node) = Self::find_version_string(child, content) {
                        results.push(Self::make_entry(key, table, version_node, content, lines));
                    }
                }
                _ => {}
            }
        }
    }

    /// Find the string value of a `version` pair directly inside a table or inline table
    fn find_version_string<'tree>(
        table_node: tree_sitter::Node<'tree>,
        content: &str,
    ) -> Option<tree_sitter::Node<'tree>> {
        let mut cursor = table_node.walk();
        for child in table_node.children(&mut cursor) {
            if child.kind() != "pair" {
                continue;
            }

            let mut pair_cursor = child.walk();
            let mut is_version_key = false;
            for pair_child in child.children(&mut pair_cursor) {
                match pair_child.kind() {
                    "bare_key" => {
                        is_version_key = &content[pair_child.byte_range()] == "version";
                    }
                    "string" if is_version_key => return Some(pair_child),
                    _ => {}
                }
            }
        }

        None
    }

    fn make_entry(
        name: &str,
        table: DependencyTable,
        version_node: tree_sitter::Node,
        content: &str,
        lines: &LineLengths,
    ) -> DependencyEntry {
        let version = unquote(&content[version_node.byte_range()]);
        let line = version_node.start_position().row;
        DependencyEntry::new(name, table, version, line, lines.get(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_extracts_dependencies() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"
version = "0.1.0"

[dependencies]
serde = "1.0.0"
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(
            result,
            vec![DependencyEntry {
                name: "serde".to_string(),
                table: DependencyTable::Normal,
                declared_version_raw: "1.0.0".to_string(),
                declared_version_normalized: "1.0.0".to_string(),
                line: 5,
                line_end: 15,
            }]
        );
    }

    #[test]
    fn parse_extracts_dev_dependencies() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"

[dev-dependencies]
mockall = "0.14"
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "mockall");
        assert_eq!(result[0].table, DependencyTable::Dev);
        assert_eq!(result[0].line, 4);
        assert_eq!(result[0].line_end, 16);
    }

    #[test]
    fn parse_extracts_build_dependencies() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"

[build-dependencies]
cc = "1.0"
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "cc");
        assert_eq!(result[0].table, DependencyTable::Build);
        assert_eq!(result[0].declared_version_raw, "1.0");
    }

    #[test]
    fn parse_extracts_inline_table_version() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"

[dependencies]
serde = { version = "^1.0", features = ["derive"] }
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "serde");
        assert_eq!(result[0].declared_version_raw, "^1.0");
        assert_eq!(result[0].declared_version_normalized, "1.0");
        assert_eq!(result[0].line, 4);
        assert_eq!(result[0].line_end, 51);
    }

    #[test]
    fn parse_extracts_single_quoted_version() {
        let parser = CargoTomlParser::new();
        let content = "[dependencies]\nanyhow = '1.0'\n";
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "anyhow");
        assert_eq!(result[0].declared_version_raw, "1.0");
    }

    #[test]
    fn parse_extracts_all_dependency_types() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"

[dependencies]
serde = "1.0"

[dev-dependencies]
mockall = "0.14"

[build-dependencies]
cc = "1.0"
"#;
        let result = parser.parse(content).unwrap();
        let names: Vec<_> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["serde", "mockall", "cc"]);
    }

    #[test]
    fn parse_returns_empty_for_no_dependencies() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"
version = "0.1.0"
"#;
        let result = parser.parse(content).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn parse_normalizes_version_requirements() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies]
serde = "^1.0"
tokio = "~1.35"
anyhow = ">=1.0"
thiserror = "=2.0"
"#;
        let result = parser.parse(content).unwrap();
        let versions: Vec<_> = result
            .iter()
            .map(|e| e.declared_version_normalized.as_str())
            .collect();
        assert_eq!(versions, vec!["1.0", "1.35", "=1.0", "2.0"]);
    }

    #[test]
    fn parse_skips_entries_without_version() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies]
serde = "1.0"
local-crate = { path = "../local-crate" }
shared = { workspace = true }
forked = { git = "https://github.com/example/forked" }
other.workspace = true
tokio = "1.0"
"#;
        let result = parser.parse(content).unwrap();
        let names: Vec<_> = result.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["serde", "tokio"]);
    }

    #[test]
    fn parse_keeps_path_dependency_with_version() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies]
another-local = { path = "./another", version = "0.1" }
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "another-local");
        assert_eq!(result[0].declared_version_raw, "0.1");
    }

    #[test]
    fn parse_extracts_dotted_version() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies]
serde.version = "1.0"
serde.features = ["derive"]
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "serde");
        assert_eq!(result[0].declared_version_raw, "1.0");
    }

    #[test]
    fn parse_extracts_sub_table_version() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies.serde]
features = ["derive"]
version = "1.0.200"

[dev-dependencies.rstest]
default-features = false
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "serde");
        assert_eq!(result[0].table, DependencyTable::Normal);
        assert_eq!(result[0].declared_version_raw, "1.0.200");
        assert_eq!(result[0].line, 2);
    }

    #[test]
    fn parse_extracts_workspace_dependencies() {
        let parser = CargoTomlParser::new();
        let content = r#"[workspace]
members = ["crates/*"]

[workspace.dependencies]
prost = "0.13"
serde = { version = "1.0", features = ["derive"] }
"#;
        let result = parser.parse(content).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "prost");
        assert_eq!(result[0].table, DependencyTable::Workspace);
        assert_eq!(result[1].name, "serde");
        assert_eq!(result[1].declared_version_raw, "1.0");
    }

    #[test]
    fn parse_ignores_other_tables() {
        let parser = CargoTomlParser::new();
        let content = r#"[package]
name = "my-app"
version = "0.1.0"

[features]
default = "std"
"#;
        let result = parser.parse(content).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn parse_reports_invalid_syntax_for_malformed_manifest() {
        let parser = CargoTomlParser::new();
        let content = r#"[dependencies]
serde = "1.0"
tokio =
"#;
        let result = parser.parse(content);
        assert!(matches!(result, Err(ParseError::InvalidSyntax(_))));
    }

    #[test]
    fn parse_measures_line_end_in_utf16_units() {
        let parser = CargoTomlParser::new();
        let content = "[dependencies]\nserde = \"1.0\" # 日本\n";
        let result = parser.parse(content).unwrap();
        assert_eq!(result[0].line_end, 18);
    }

    #[test]
    fn can_parse_accepts_cargo_manifest_only() {
        let parser = CargoTomlParser::new();
        assert!(parser.can_parse("file:///project/Cargo.toml"));
        assert!(!parser.can_parse("file:///project/package.json"));
    }
}
