use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::options::DiffOptions;

/// The `@@ -old_start,old_count +new_start,new_count @@` header shared by every
/// line of one hunk.
///
/// Starts are 1-based. A side with a zero count names the line *before* the
/// change, so a deletion at the top of a file has `new_start == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[display(fmt = "@@ -{},{} +{},{} @@", old_start, old_count, new_start, new_count)]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
}

impl HunkHeader {
    pub fn new(old_start: usize, old_count: usize, new_start: usize, new_count: usize) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
        }
    }
}

/// One changed physical line, as reported by a raw diff source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawLineRecord {
    /// Header of the enclosing hunk, repeated on every record of that hunk
    pub header: HunkHeader,

    /// 1-based line number in the old text, set for removed lines
    pub old_lineno: Option<usize>,

    /// 1-based line number in the new text, set for added lines
    pub new_lineno: Option<usize>,

    /// The line content, including its terminator when it has one
    pub text: String,
}

impl RawLineRecord {
    /// A line that only exists in the old text.
    pub fn removed(header: HunkHeader, old_lineno: usize, text: impl Into<String>) -> Self {
        Self {
            header,
            old_lineno: Some(old_lineno),
            new_lineno: None,
            text: text.into(),
        }
    }

    /// A line that only exists in the new text.
    pub fn added(header: HunkHeader, new_lineno: usize, text: impl Into<String>) -> Self {
        Self {
            header,
            old_lineno: None,
            new_lineno: Some(new_lineno),
            text: text.into(),
        }
    }

    /// Whether this record is an added line; errors if the record is neither or both.
    pub fn is_added(&self) -> DiffResult<bool> {
        match (self.old_lineno, self.new_lineno) {
            (None, Some(_)) => Ok(true),
            (Some(_), None) => Ok(false),
            _ => Err(DiffError::MissingLineOrigin {
                text: self.text.clone(),
            }),
        }
    }
}

/// A source of raw line records for two versions of one document.
///
/// An empty result means the texts do not differ.
pub trait LineDiffer: Send + Sync {
    fn diff_lines(
        &self,
        old_text: &str,
        new_text: &str,
        options: &DiffOptions,
    ) -> DiffResult<Vec<RawLineRecord>>;
}

impl<F> LineDiffer for F
where
    F: Fn(&str, &str, &DiffOptions) -> DiffResult<Vec<RawLineRecord>> + Send + Sync,
{
    fn diff_lines(
        &self,
        old_text: &str,
        new_text: &str,
        options: &DiffOptions,
    ) -> DiffResult<Vec<RawLineRecord>> {
        self(old_text, new_text, options)
    }
}
