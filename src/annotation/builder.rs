//! Annotation text and anchor construction

use crate::annotation::{Annotation, ColorHint};
use crate::parser::types::DependencyEntry;

/// Build the annotation for a declared dependency once its latest version is known
///
/// The label is anchored at the end of the line that holds the version string.
pub fn build_annotation(entry: &DependencyEntry, latest_version: &str) -> Annotation {
    let (text, color_hint) = if entry.declared_version_normalized == latest_version {
        (format!(" (latest: {latest_version})"), ColorHint::Match)
    } else {
        (format!(" ⟶ {latest_version}"), ColorHint::Mismatch)
    };

    Annotation {
        dependency_name: entry.name.clone(),
        anchor_line: entry.line,
        anchor_column: entry.line_end,
        text,
        color_hint: Some(color_hint),
    }
}

/// Build the suggestion shown after a freshly typed `name =` line
pub fn build_new_dependency_annotation(
    name: &str,
    line: usize,
    column: usize,
    latest_version: &str,
) -> Annotation {
    Annotation {
        dependency_name: name.to_string(),
        anchor_line: line,
        anchor_column: column,
        text: format!(" \"{latest_version}\""),
        color_hint: None,
    }
}
