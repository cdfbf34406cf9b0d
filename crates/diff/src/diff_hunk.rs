use derive_more::Display;
use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::intra_line::{trim_line_terminator, IntraLineChanges};
use crate::raw_line::HunkHeader;

/// Represents the kind of a diff hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HunkKind {
    /// The hunk only adds lines to the working text
    #[display(fmt = "Added")]
    Added,

    /// The hunk only removes lines from the base text
    #[display(fmt = "Removed")]
    Removed,

    /// The hunk replaces base lines with working lines
    #[display(fmt = "Modified")]
    Modified,
}

impl HunkKind {
    /// Classify a hunk from the line counts in its header
    pub fn classify(header: &HunkHeader) -> DiffResult<Self> {
        match (header.old_count, header.new_count) {
            (0, 0) => Err(DiffError::EmptyHunk(*header)),
            (0, _) => Ok(HunkKind::Added),
            (_, 0) => Ok(HunkKind::Removed),
            _ => Ok(HunkKind::Modified),
        }
    }
}

/// Represents one block of changed lines between the base and working text.
///
/// Rows are 0-based and refer to the working text. A removed hunk has no
/// working lines of its own; it is anchored to the row above the deletion and
/// `end_row == start_row`. A deletion at the very top of the document is
/// anchored to row 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hunk {
    /// The kind of the hunk
    pub kind: HunkKind,

    /// First working row covered by the hunk
    pub start_row: usize,

    /// Last working row covered by the hunk (inclusive)
    pub end_row: usize,

    /// The raw header this hunk was built from
    pub header: HunkHeader,

    /// Working-side lines, in document order
    pub added_lines: Vec<String>,

    /// Base-side lines, in document order
    pub removed_lines: Vec<String>,

    /// Per line pair changes, present only on pairable hunks
    pub intra_line: Option<IntraLineChanges>,
}

impl Hunk {
    /// Create an empty hunk for the given header; lines are pushed by the builder
    pub fn new(header: HunkHeader) -> DiffResult<Self> {
        let kind = HunkKind::classify(&header)?;
        let start_row = header.new_start.saturating_sub(1);
        let end_row = match kind {
            HunkKind::Removed => start_row,
            HunkKind::Added | HunkKind::Modified => start_row
                .checked_add(header.new_count - 1)
                .ok_or(DiffError::HunkOutOfRange(header))?,
        };

        // counts come from the raw source and are only checked once the lines are in
        Ok(Self {
            kind,
            start_row,
            end_row,
            header,
            added_lines: Vec::new(),
            removed_lines: Vec::new(),
            intra_line: None,
        })
    }

    /// Whether added and removed lines can be compared pairwise
    pub fn is_pairable(&self) -> bool {
        !self.added_lines.is_empty() && self.added_lines.len() == self.removed_lines.len()
    }

    /// Rows covered by this hunk
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start_row..=self.end_row
    }

    /// Check if this hunk covers the given working row
    pub fn contains_row(&self, row: usize) -> bool {
        self.start_row <= row && row <= self.end_row
    }

    /// Row before which the removed text is shown by the host
    pub fn insertion_row(&self) -> usize {
        match self.kind {
            HunkKind::Modified => self.start_row,
            HunkKind::Added | HunkKind::Removed => self.header.new_start,
        }
    }

    /// The removed lines joined verbatim
    pub fn removed_text(&self) -> String {
        self.removed_lines.concat()
    }

    /// The removed text without its final line terminator, for display in a
    /// block above the working lines
    pub fn removed_text_for_display(&self) -> DiffResult<String> {
        let Some((last, rest)) = self.removed_lines.split_last() else {
            return Err(DiffError::InvalidHunkOperation {
                kind: self.kind,
                operation: "display removed text",
            });
        };
        let mut text = rest.concat();
        text.push_str(trim_line_terminator(last));
        Ok(text)
    }

    /// Number of working rows this hunk adds relative to the base
    pub fn line_delta(&self) -> isize {
        self.added_lines.len() as isize - self.removed_lines.len() as isize
    }

    /// Whether any intra-line highlight exists on the given line of the hunk
    pub fn has_intra_line_highlight(&self, line_index: usize) -> bool {
        self.intra_line
            .as_ref()
            .and_then(|changes| changes.line(line_index))
            .map_or(false, |pair| pair.has_highlight())
    }

    /// Copy of this hunk moved down (or up) by `delta` working rows
    pub(crate) fn shifted(&self, delta: isize) -> Self {
        let shift = |value: usize| (value as isize + delta).max(0) as usize;
        let mut hunk = self.clone();
        hunk.start_row = shift(self.start_row);
        hunk.end_row = shift(self.end_row);
        hunk.header.new_start = shift(self.header.new_start);
        hunk
    }
}

/// Line counts across a set of hunks, as shown in a status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffStats {
    pub hunks: usize,
    pub added_lines: usize,
    pub removed_lines: usize,
}

impl DiffStats {
    pub fn from_hunks<'a>(hunks: impl IntoIterator<Item = &'a Hunk>) -> Self {
        hunks.into_iter().fold(Self::default(), |stats, hunk| Self {
            hunks: stats.hunks + 1,
            added_lines: stats.added_lines + hunk.added_lines.len(),
            removed_lines: stats.removed_lines + hunk.removed_lines.len(),
        })
    }

    /// Check if the diff has any changes
    pub fn has_changes(&self) -> bool {
        self.hunks > 0
    }
}
