// Hunk computation engine for inline version-control diffs
// This crate turns a base text and a working text into classified hunks,
// localizes changes inside modified lines, and computes revert edits

mod buffer_diff;
mod diff_hunk;
mod error;
mod hunk_builder;
mod intra_line;
mod line_differ;
mod options;
mod raw_line;
mod revert;
mod subscriptions;
mod unified;

pub use buffer_diff::{
    ComputedHunks, DiffSession, HunkId, RecomputeTicket, RefreshOutcome, SessionHunk, TextEdit,
};
pub use diff_hunk::{DiffStats, Hunk, HunkKind};
pub use error::{DiffError, DiffResult};
pub use hunk_builder::{annotate_intra_line, build_hunks, compute_hunks, compute_hunks_with};
pub use intra_line::{
    common_affix_ranges, compute_intra_line_changes, trim_line_terminator, word_spans,
    ChangeRange, IntraLineChanges, IntraLineDiffer, LinePairChanges, RelativeChange, WordChange,
    WordSpan, WordSpans,
};
pub use line_differ::SimilarLineDiffer;
pub use options::{DiffOptions, IntraLineMode};
pub use raw_line::{HunkHeader, LineDiffer, RawLineRecord};
pub use revert::{
    compute_revert_edit, copy_removed_text, extract_old_text, hunk_range, BufferRange, Point,
    RevertEdit,
};
pub use subscriptions::Subscriptions;
pub use unified::{parse_hunk_header, parse_unified_diff, UnifiedDiffSource};
