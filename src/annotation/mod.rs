//! Inline version annotations
//!
//! - [`builder`]: Turns a resolved version into an [`Annotation`]
//! - [`store`]: Per-document map of current annotations, keyed by crate name

pub mod builder;
pub mod store;

pub use builder::{build_annotation, build_new_dependency_annotation};
pub use store::{AnnotationStore, Generation};

/// Rendering style of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorHint {
    /// Declared version equals the latest published version
    Match,
    /// A newer version is available
    Mismatch,
}

impl ColorHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorHint::Match => "match",
            ColorHint::Mismatch => "mismatch",
        }
    }
}

/// One inline label anchored after a dependency line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub dependency_name: String,
    /// Line of the anchor (0-indexed)
    pub anchor_line: usize,
    /// Column of the anchor in UTF-16 code units (end of the line)
    pub anchor_column: usize,
    pub text: String,
    pub color_hint: Option<ColorHint>,
}
