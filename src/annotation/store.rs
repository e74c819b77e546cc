//! Annotation store
//!
//! Holds at most one annotation per crate name. Every full scan starts a new
//! [`Generation`]; writes tagged with an older generation are dropped so that
//! a slow lookup from a superseded scan cannot overwrite fresher results.
//!
//! Lookups still in flight reserve the line they started from. Reserved
//! lines follow edits exactly like stored anchors, so a late result lands on
//! the line its dependency has moved to.

use std::ops::Range;

use indexmap::IndexMap;
use tracing::debug;

use crate::annotation::Annotation;

/// Identifier of one full scan of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct AnnotationStore {
    entries: IndexMap<String, Annotation>,
    /// Current line of each lookup in flight, keyed by crate name and the
    /// line the lookup started from
    reserved: IndexMap<(String, usize), usize>,
    generation: Generation,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation; writes tagged with it are accepted
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new generation and drop every annotation and reservation
    pub fn begin_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.clear();
        self.reserved.clear();
        self.generation
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert or replace the annotation for its crate (last write wins)
    pub fn set(&mut self, name: &str, annotation: Annotation) {
        self.entries.insert(name.to_string(), annotation);
    }

    /// Insert or replace the annotation unless `generation` is older than the store's
    ///
    /// Returns false if the write was discarded.
    pub fn set_for_generation(&mut self, generation: Generation, annotation: Annotation) -> bool {
        if generation < self.generation {
            debug!(
                "Dropping stale annotation for {} (generation {} < {})",
                annotation.dependency_name, generation, self.generation
            );
            return false;
        }

        let name = annotation.dependency_name.clone();
        self.set(&name, annotation);
        true
    }

    /// Remember `line` for a lookup of `name` that is about to start
    pub fn reserve_anchor(&mut self, name: &str, line: usize) {
        self.reserved.insert((name.to_string(), line), line);
    }

    /// Release the reservation made at `line` and return where that line is now
    ///
    /// `None` when the line was deleted or a new generation has started since.
    pub fn take_anchor(&mut self, name: &str, line: usize) -> Option<usize> {
        self.reserved.shift_remove(&(name.to_string(), line))
    }

    pub fn remove(&mut self, name: &str) -> Option<Annotation> {
        self.entries.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Annotation> {
        self.entries.get(name)
    }

    /// All annotations ordered by anchor line, then crate name
    pub fn all_values(&self) -> Vec<Annotation> {
        let mut values: Vec<Annotation> = self.entries.values().cloned().collect();
        values.sort_by(|a, b| {
            (a.anchor_line, &a.dependency_name).cmp(&(b.anchor_line, &b.dependency_name))
        });
        values
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Follow an edit that removed the lines in `dropped` and moved every
    /// line from `dropped.end` onwards by `delta`
    ///
    /// Applies to stored anchors and reserved lines alike.
    pub fn shift_anchors(&mut self, dropped: Range<usize>, delta: isize) {
        self.entries
            .retain(|_, annotation| !dropped.contains(&annotation.anchor_line));
        self.reserved.retain(|_, line| !dropped.contains(line));

        if delta == 0 {
            return;
        }

        let shifted = self
            .entries
            .values_mut()
            .map(|annotation| &mut annotation.anchor_line)
            .chain(self.reserved.values_mut());
        for line in shifted {
            if *line >= dropped.end {
                *line = line.saturating_add_signed(delta);
            }
        }
    }
}
