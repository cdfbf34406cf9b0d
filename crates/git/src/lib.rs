// Git integration for inline diffs
// This crate supplies diff base texts from a repository and a libgit2-backed line differ

mod line_differ;
mod repository;

pub use line_differ::GitLineDiffer;
pub use repository::{last_commit_by, Commit, GitUser, Repository};
