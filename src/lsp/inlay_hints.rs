//! Inlay hints for stored annotations

use tower_lsp::lsp_types::{InlayHint, InlayHintLabel, InlayHintTooltip, Position, Range};

use crate::annotation::{Annotation, ColorHint};

fn tooltip(color_hint: Option<ColorHint>) -> &'static str {
    match color_hint {
        Some(ColorHint::Match) => "Up to date",
        Some(ColorHint::Mismatch) => "Newer version available",
        None => "Latest published version",
    }
}

/// Render one annotation as an inlay hint at its anchor
///
/// The color hint travels in `data` so clients can style matches and
/// mismatches differently.
pub fn create_inlay_hint(annotation: &Annotation) -> InlayHint {
    InlayHint {
        position: Position::new(annotation.anchor_line as u32, annotation.anchor_column as u32),
        label: InlayHintLabel::String(annotation.text.clone()),
        kind: None,
        text_edits: None,
        tooltip: Some(InlayHintTooltip::String(
            tooltip(annotation.color_hint).to_string(),
        )),
        padding_left: None,
        padding_right: None,
        data: annotation
            .color_hint
            .map(|hint| serde_json::Value::String(hint.as_str().to_string())),
    }
}

/// Inlay hints whose anchor falls inside `range`
pub fn inlay_hints_in_range(annotations: &[Annotation], range: Range) -> Vec<InlayHint> {
    annotations
        .iter()
        .filter(|annotation| {
            let line = annotation.anchor_line as u32;
            line >= range.start.line && line <= range.end.line
        })
        .map(create_inlay_hint)
        .collect()
}
