//! Localization of changes inside pairs of modified lines.
//!
//! Two strategies share the [`IntraLineDiffer`] contract: [`RelativeChange`]
//! trims the common prefix and suffix of each line pair, [`WordChange`] runs a
//! word diff over the whole hunk. Both report ranges in character columns local
//! to one line, with the line terminator excluded.

use similar::{ChangeTag, TextDiff};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::options::IntraLineMode;

/// A span of characters within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangeRange {
    /// First changed column
    pub start: usize,

    /// Number of changed characters
    pub length: usize,
}

impl ChangeRange {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Get the end of the range (exclusive)
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Highlighted ranges for one removed line and its paired added line.
///
/// Only non-empty ranges are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinePairChanges {
    pub removed: Vec<ChangeRange>,
    pub added: Vec<ChangeRange>,
}

impl LinePairChanges {
    pub fn has_highlight(&self) -> bool {
        !self.removed.is_empty() || !self.added.is_empty()
    }

    fn push_removed(&mut self, range: ChangeRange) {
        push_merged(&mut self.removed, range);
    }

    fn push_added(&mut self, range: ChangeRange) {
        push_merged(&mut self.added, range);
    }
}

fn push_merged(ranges: &mut Vec<ChangeRange>, range: ChangeRange) {
    if range.is_empty() {
        return;
    }
    match ranges.last_mut() {
        Some(last) if last.end() == range.start => last.length += range.length,
        _ => ranges.push(range),
    }
}

/// Intra-line changes of a pairable hunk, one entry per line pair
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntraLineChanges {
    pub mode: IntraLineMode,
    pub lines: Vec<LinePairChanges>,
}

impl IntraLineChanges {
    pub fn line(&self, index: usize) -> Option<&LinePairChanges> {
        self.lines.get(index)
    }

    /// Added ranges with their working row, given the hunk's first row
    pub fn added_ranges(&self, start_row: usize) -> impl Iterator<Item = (usize, ChangeRange)> + '_ {
        self.lines.iter().enumerate().flat_map(move |(index, pair)| {
            pair.added.iter().map(move |range| (start_row + index, *range))
        })
    }

    /// Removed ranges with their row inside the removed text block
    pub fn removed_ranges(&self) -> impl Iterator<Item = (usize, ChangeRange)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .flat_map(|(index, pair)| pair.removed.iter().map(move |range| (index, *range)))
    }
}

/// Common contract of the intra-line strategies.
///
/// Callers only invoke it with equal, non-zero line counts.
pub trait IntraLineDiffer {
    fn compute(&self, old_lines: &[String], new_lines: &[String]) -> Vec<LinePairChanges>;
}

/// Character-level strategy: the changed region is what remains after trimming
/// the common prefix and suffix of each line pair
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeChange;

impl IntraLineDiffer for RelativeChange {
    fn compute(&self, old_lines: &[String], new_lines: &[String]) -> Vec<LinePairChanges> {
        old_lines
            .iter()
            .zip(new_lines)
            .map(|(old, new)| {
                let (removed, added) =
                    common_affix_ranges(trim_line_terminator(old), trim_line_terminator(new));
                let mut pair = LinePairChanges::default();
                pair.push_removed(removed);
                pair.push_added(added);
                pair
            })
            .collect()
    }
}

/// Word-level strategy over the whole hunk
#[derive(Debug, Clone, Copy, Default)]
pub struct WordChange;

impl IntraLineDiffer for WordChange {
    fn compute(&self, old_lines: &[String], new_lines: &[String]) -> Vec<LinePairChanges> {
        let spans = word_spans(old_lines, new_lines);
        let mut lines = vec![LinePairChanges::default(); old_lines.len().max(new_lines.len())];

        for span in spans.old.iter().filter(|span| span.removed) {
            if let Some(pair) = lines.get_mut(span.row) {
                pair.push_removed(span.range());
            }
        }
        for span in spans.new.iter().filter(|span| span.added) {
            if let Some(pair) = lines.get_mut(span.row) {
                pair.push_added(span.range());
            }
        }
        lines
    }
}

/// Compute the changed range of the old and the new line by trimming their
/// common prefix and suffix.
///
/// Identical lines produce zero-length ranges at the end of the line.
pub fn common_affix_ranges(old: &str, new: &str) -> (ChangeRange, ChangeRange) {
    let old_len = old.chars().count();
    let new_len = new.chars().count();

    let prefix = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .count();

    // the suffix may not reach back into the matched prefix
    let max_suffix = (old_len - prefix).min(new_len - prefix);
    let suffix = old
        .chars()
        .rev()
        .zip(new.chars().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    (
        ChangeRange::new(prefix, old_len - prefix - suffix),
        ChangeRange::new(prefix, new_len - prefix - suffix),
    )
}

/// A token of the word diff placed on one side of the hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordSpan {
    /// Line index within the hunk side
    pub row: usize,
    pub start_col: usize,
    pub length: usize,
    pub added: bool,
    pub removed: bool,
}

impl WordSpan {
    /// Whether the span is highlighted rather than used for alignment
    pub fn is_changed(&self) -> bool {
        self.added || self.removed
    }

    pub fn range(&self) -> ChangeRange {
        ChangeRange::new(self.start_col, self.length)
    }
}

/// Word diff tokens placed on the old and the new side
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordSpans {
    pub old: Vec<WordSpan>,
    pub new: Vec<WordSpan>,
}

#[derive(Debug, Default)]
struct Cursor {
    row: usize,
    col: usize,
}

impl Cursor {
    /// Place `value` at the cursor, splitting it at embedded line breaks
    fn place(&mut self, value: &str, spans: &mut Vec<WordSpan>, added: bool, removed: bool) {
        for (index, segment) in value.split('\n').enumerate() {
            if index > 0 {
                self.row += 1;
                self.col = 0;
            }
            let length = segment.chars().count();
            if length == 0 {
                continue;
            }
            spans.push(WordSpan {
                row: self.row,
                start_col: self.col,
                length,
                added,
                removed,
            });
            self.col += length;
        }
    }
}

/// Run a word diff between all removed and all added lines of a hunk.
///
/// Lines are joined with `\n` so the tokenizer sees one text per side; tokens
/// that span a line break are split back onto their rows.
pub fn word_spans(old_lines: &[String], new_lines: &[String]) -> WordSpans {
    let old_text = join_lines(old_lines);
    let new_text = join_lines(new_lines);
    let diff = TextDiff::from_words(old_text.as_str(), new_text.as_str());

    let mut spans = WordSpans::default();
    let mut old_cursor = Cursor::default();
    let mut new_cursor = Cursor::default();

    for change in diff.iter_all_changes() {
        let value = change.value();
        match change.tag() {
            ChangeTag::Equal => {
                old_cursor.place(value, &mut spans.old, false, false);
                new_cursor.place(value, &mut spans.new, false, false);
            }
            ChangeTag::Delete => old_cursor.place(value, &mut spans.old, false, true),
            ChangeTag::Insert => new_cursor.place(value, &mut spans.new, true, false),
        }
    }

    spans
}

fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| trim_line_terminator(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip one trailing `\n`, `\r\n` or `\r`
pub fn trim_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}

/// Compute intra-line changes for a hunk's lines with the given strategy.
///
/// Returns `None` when the mode is off or the lines cannot be paired.
pub fn compute_intra_line_changes(
    mode: IntraLineMode,
    old_lines: &[String],
    new_lines: &[String],
) -> Option<IntraLineChanges> {
    if old_lines.is_empty() || old_lines.len() != new_lines.len() {
        return None;
    }
    let lines = match mode {
        IntraLineMode::Off => return None,
        IntraLineMode::Relative => RelativeChange.compute(old_lines, new_lines),
        IntraLineMode::Word => WordChange.compute(old_lines, new_lines),
    };
    Some(IntraLineChanges { mode, lines })
}
