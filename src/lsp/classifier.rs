//! Line-local classification of text edits
//!
//! Decides from the edited line alone whether an edit started a new
//! dependency line, touched a version string, or can be ignored. The
//! manifest itself is only parsed on full scans.

use regex::Regex;

/// What a single text change means for the annotations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeClassification {
    /// A bare `name =` line was typed; suggest the latest version of `name`
    NewDependencyLine { name: String },
    /// A version string changed; re-scan the manifest
    VersionEdit,
    Irrelevant,
}

pub struct EditClassifier {
    /// `name =` with nothing after the equals sign
    bare_key_re: Regex,
    /// `name = "..."`
    double_quoted_re: Regex,
    /// `name = '...'`
    single_quoted_re: Regex,
    /// `version = "..."` anywhere on the line
    embedded_version_re: Regex,
}

impl EditClassifier {
    pub fn new() -> Self {
        Self {
            bare_key_re: Regex::new(r"^\s*([a-zA-Z0-9_-]+)\s*=\s*$").unwrap(),
            double_quoted_re: Regex::new(r#"^\s*[a-zA-Z0-9_-]+\s*=\s*"[^"]*""#).unwrap(),
            single_quoted_re: Regex::new(r"^\s*[a-zA-Z0-9_-]+\s*=\s*'[^']*'").unwrap(),
            embedded_version_re: Regex::new(r#"version\s*=\s*"[^"]*""#).unwrap(),
        }
    }

    /// Classify one change given the inserted text and the full post-edit line
    pub fn classify(&self, inserted_text: &str, line_text: &str) -> ChangeClassification {
        if line_text.trim_start().starts_with('#') {
            return ChangeClassification::Irrelevant;
        }

        if let Some(name) = self.bare_key(line_text) {
            return ChangeClassification::NewDependencyLine { name };
        }

        // A typed `=` that leaves anything after it (e.g. `a = b`) is not a
        // new dependency line and falls through to the version checks
        let line_has_version = self.double_quoted_re.is_match(line_text)
            || self.single_quoted_re.is_match(line_text)
            || self.embedded_version_re.is_match(line_text);
        let inserted_version_text =
            inserted_text == "\"" || inserted_text == "'" || inserted_text.contains("version");

        if line_has_version || inserted_version_text {
            ChangeClassification::VersionEdit
        } else {
            ChangeClassification::Irrelevant
        }
    }

    fn bare_key(&self, line_text: &str) -> Option<String> {
        self.bare_key_re
            .captures(line_text)
            .map(|captures| captures[1].to_string())
    }
}

impl Default for EditClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn new_line(name: &str) -> ChangeClassification {
        ChangeClassification::NewDependencyLine {
            name: name.to_string(),
        }
    }

    #[rstest]
    #[case("=", "foo = ", new_line("foo"))]
    #[case("=", "foo =", new_line("foo"))]
    #[case(" ", "  serde_json = ", new_line("serde_json"))]
    #[case("=", "tree-sitter=", new_line("tree-sitter"))]
    #[case("\"", "foo = \"1.0\"", ChangeClassification::VersionEdit)]
    #[case("'", "foo = '1.0'", ChangeClassification::VersionEdit)]
    #[case("1", "foo = \"1.0\"", ChangeClassification::VersionEdit)]
    #[case("1", "serde = { version = \"1.0\", features = [\"derive\"] }", ChangeClassification::VersionEdit)]
    #[case("\"", "serde = { features = [\"", ChangeClassification::VersionEdit)]
    #[case("version", "serde = { version", ChangeClassification::VersionEdit)]
    #[case("a", "[dependencies]", ChangeClassification::Irrelevant)]
    #[case("x", "edition = 2024", ChangeClassification::Irrelevant)]
    #[case("=", "a = b", ChangeClassification::Irrelevant)]
    #[case("", "", ChangeClassification::Irrelevant)]
    fn classify_returns_expected(
        #[case] inserted: &str,
        #[case] line: &str,
        #[case] expected: ChangeClassification,
    ) {
        let classifier = EditClassifier::new();
        assert_eq!(classifier.classify(inserted, line), expected);
    }

    #[rstest]
    #[case("=")]
    #[case("\"")]
    #[case("'")]
    #[case("version")]
    #[case("x")]
    fn classify_comment_line_is_irrelevant_regardless_of_inserted_text(#[case] inserted: &str) {
        let classifier = EditClassifier::new();
        assert_eq!(
            classifier.classify(inserted, "# comment"),
            ChangeClassification::Irrelevant
        );
        assert_eq!(
            classifier.classify(inserted, "  # serde = \"1.0\""),
            ChangeClassification::Irrelevant
        );
    }
}
