use std::time::Duration;

use derive_more::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How changes inside a pair of modified lines are localized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntraLineMode {
    /// No intra-line changes are computed
    #[display(fmt = "Off")]
    Off,

    /// Trim the common prefix and suffix of each line pair
    #[default]
    #[display(fmt = "Relative")]
    Relative,

    /// Diff the line pairs word by word
    #[display(fmt = "Word")]
    Word,
}

/// Settings for one hunk computation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiffOptions {
    /// Treat lines that differ only in trailing whitespace as equal
    pub ignore_eol_whitespace: bool,

    /// Intra-line strategy applied to pairable hunks
    pub intra_line: IntraLineMode,

    /// Upper bound on the line diff before it falls back to a coarser result
    pub timeout: Option<Duration>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_eol_whitespace: false,
            intra_line: IntraLineMode::default(),
            timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl DiffOptions {
    pub fn ignore_eol_whitespace(mut self, ignore: bool) -> Self {
        self.ignore_eol_whitespace = ignore;
        self
    }

    pub fn intra_line(mut self, mode: IntraLineMode) -> Self {
        self.intra_line = mode;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
