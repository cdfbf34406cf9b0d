//! Pure revert and extract operations over a [`Hunk`].
//!
//! Nothing here touches a document; [`RevertEdit::apply`] exists for callers
//! that keep their own [`Rope`] copy of the working text.

use derive_more::Display;
use ropey::Rope;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::diff_hunk::{Hunk, HunkKind};
use crate::error::{DiffError, DiffResult};

/// A row/column position in the working text (both 0-based, columns in chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[display(fmt = "[{}, {}]", row, column)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Char offset of this point in `rope`, clamped to the text
    pub fn to_char_idx(self, rope: &Rope) -> usize {
        if self.row >= rope.len_lines() {
            return rope.len_chars();
        }
        let line_start = rope.line_to_char(self.row);
        let line_len = rope.line(self.row).len_chars();
        line_start + self.column.min(line_len)
    }
}

/// A range of the working text between two points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[display(fmt = "{} - {}", start, end)]
pub struct BufferRange {
    pub start: Point,
    pub end: Point,
}

impl BufferRange {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `point`
    pub fn point(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The edit that restores the base text of one hunk
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RevertEdit {
    pub range: BufferRange,
    pub replacement: String,
}

impl RevertEdit {
    /// Apply the edit to a rope holding the working text
    pub fn apply(&self, rope: &mut Rope) {
        let start = self.range.start.to_char_idx(rope);
        let end = self.range.end.to_char_idx(rope).max(start);
        rope.remove(start..end);
        rope.insert(start, &self.replacement);
    }
}

/// The removed lines of a hunk, verbatim and in order
pub fn extract_old_text(hunk: &Hunk) -> String {
    hunk.removed_text()
}

/// The removed text to put on the clipboard; an added hunk has none
pub fn copy_removed_text(hunk: &Hunk) -> DiffResult<String> {
    match hunk.kind {
        HunkKind::Added => Err(DiffError::InvalidHunkOperation {
            kind: hunk.kind,
            operation: "copy removed text",
        }),
        HunkKind::Removed | HunkKind::Modified => Ok(extract_old_text(hunk)),
    }
}

/// The working range a hunk occupies
pub fn hunk_range(hunk: &Hunk) -> BufferRange {
    match hunk.kind {
        HunkKind::Added | HunkKind::Modified => BufferRange::new(
            Point::new(hunk.start_row, 0),
            Point::new(hunk.end_row + 1, 0),
        ),
        // the removed text goes back in right below the anchor row
        HunkKind::Removed => BufferRange::point(Point::new(hunk.header.new_start, 0)),
    }
}

/// Compute the edit that replaces the hunk's working lines with its base lines
pub fn compute_revert_edit(hunk: &Hunk) -> RevertEdit {
    RevertEdit {
        range: hunk_range(hunk),
        replacement: extract_old_text(hunk),
    }
}
