//! Live text of an open document and its annotations

use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

use crate::annotation::{Annotation, AnnotationStore};

/// State kept for every open document
#[derive(Debug, Default)]
pub struct DocumentState {
    text: String,
    pub store: AnnotationStore,
}

impl DocumentState {
    pub fn new(text: String) -> Self {
        Self {
            text,
            store: AnnotationStore::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Text of a line without its line terminator
    pub fn line(&self, line: usize) -> Option<&str> {
        self.text
            .split('\n')
            .nth(line)
            .map(|text| text.trim_end_matches('\r'))
    }

    /// Length of a line in UTF-16 code units, 0 past the end of the document
    pub fn line_len(&self, line: usize) -> usize {
        self.line(line)
            .map(|text| text.encode_utf16().count())
            .unwrap_or(0)
    }

    /// Apply one change from `textDocument/didChange`
    ///
    /// Incremental changes move the anchors of stored annotations along with
    /// the text and return the first edited line. A change without a range
    /// replaces the whole text and returns `None`.
    pub fn apply_change(&mut self, change: &TextDocumentContentChangeEvent) -> Option<usize> {
        let Some(range) = change.range else {
            self.text = change.text.clone();
            return None;
        };

        let start = self.offset_at(range.start);
        let end = self.offset_at(range.end).max(start);
        self.text.replace_range(start..end, &change.text);

        let start_line = range.start.line as usize;
        let end_line = (range.end.line as usize).max(start_line);
        let removed_lines = (end_line - start_line) as isize;
        let added_lines = change.text.matches('\n').count() as isize;

        // An edit starting at column 0 pushes the whole first line along with
        // it; otherwise the first line keeps its anchor
        let dropped = if range.start.character == 0 {
            start_line..end_line
        } else {
            start_line + 1..end_line + 1
        };
        self.store
            .shift_anchors(dropped, added_lines - removed_lines);

        Some(start_line)
    }

    /// Annotations anchored at the current end of their lines
    pub fn snapshot(&self) -> Vec<Annotation> {
        self.store
            .all_values()
            .into_iter()
            .map(|mut annotation| {
                annotation.anchor_column = self.line_len(annotation.anchor_line);
                annotation
            })
            .collect()
    }

    /// Byte offset of an LSP position (UTF-16 columns), clamped to the line end
    fn offset_at(&self, position: Position) -> usize {
        let mut line_start = 0;
        for _ in 0..position.line {
            match self.text[line_start..].find('\n') {
                Some(newline) => line_start += newline + 1,
                None => return self.text.len(),
            }
        }

        let line_end = self.text[line_start..]
            .find('\n')
            .map(|newline| line_start + newline)
            .unwrap_or(self.text.len());

        let mut units = 0;
        for (offset, c) in self.text[line_start..line_end].char_indices() {
            if units >= position.character as usize {
                return line_start + offset;
            }
            units += c.len_utf16();
        }

        line_end
    }
}
