//! Error types for the inline diff engine.

use crate::diff_hunk::HunkKind;
use crate::raw_line::HunkHeader;

/// Errors that can occur while building or operating on hunks.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A unified diff `@@` line could not be parsed.
    #[error("line {line}: malformed hunk header {header:?}")]
    MalformedHeader { line: usize, header: String },

    /// A line inside a unified diff hunk did not start with `-`, `+` or ` `.
    #[error("line {line}: unexpected line prefix {prefix:?} inside hunk")]
    UnexpectedLinePrefix { line: usize, prefix: char },

    /// Raw records arrived with a hunk start that does not follow the previous one.
    #[error("hunk starting at new line {next} follows hunk starting at new line {previous}")]
    HunkOutOfOrder { previous: usize, next: usize },

    /// A raw record was neither a removed nor an added line (or claimed to be both).
    #[error("raw line record {text:?} must carry exactly one of an old or a new line number")]
    MissingLineOrigin { text: String },

    /// The lines of a hunk do not agree with the counts in its header.
    #[error(
        "hunk {header} declares -{} +{} lines but carries -{removed} +{added}",
        .header.old_count,
        .header.new_count
    )]
    HunkLineCountMismatch {
        header: HunkHeader,
        removed: usize,
        added: usize,
    },

    /// A header whose line range cannot be addressed as working rows.
    #[error("hunk {0} reaches past the last addressable row")]
    HunkOutOfRange(HunkHeader),

    /// A header claiming no lines on either side.
    #[error("hunk {0} has no changed lines")]
    EmptyHunk(HunkHeader),

    /// The requested operation does not make sense for this kind of hunk.
    #[error("cannot {operation} on a hunk of kind {kind}")]
    InvalidHunkOperation {
        kind: HunkKind,
        operation: &'static str,
    },

    /// An external line differ failed.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
