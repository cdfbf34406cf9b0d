use anyhow::Context;
use git2::{DiffLineType, DiffOptions as Git2DiffOptions, Patch};
use inline_diff::{DiffOptions, DiffResult, HunkHeader, LineDiffer, RawLineRecord};
use log::trace;

/// Raw diff source backed by libgit2's buffer diff, numbered like `git diff -U0`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitLineDiffer;

impl LineDiffer for GitLineDiffer {
    fn diff_lines(
        &self,
        old_text: &str,
        new_text: &str,
        options: &DiffOptions,
    ) -> DiffResult<Vec<RawLineRecord>> {
        let mut git_options = Git2DiffOptions::new();
        git_options
            .context_lines(0)
            .interhunk_lines(0)
            .ignore_whitespace_eol(options.ignore_eol_whitespace);

        let patch = Patch::from_buffers(
            old_text.as_bytes(),
            None,
            new_text.as_bytes(),
            None,
            Some(&mut git_options),
        )
        .context("libgit2 failed to diff the buffers")?;

        let mut records = Vec::new();
        for hunk_index in 0..patch.num_hunks() {
            let (hunk, line_count) = patch
                .hunk(hunk_index)
                .context("libgit2 failed to read a hunk")?;
            let header = HunkHeader::new(
                hunk.old_start() as usize,
                hunk.old_lines() as usize,
                hunk.new_start() as usize,
                hunk.new_lines() as usize,
            );

            for line_index in 0..line_count {
                let line = patch
                    .line_in_hunk(hunk_index, line_index)
                    .context("libgit2 failed to read a hunk line")?;
                // context and end-of-file newline markers carry no line of their own
                if !matches!(
                    line.origin_value(),
                    DiffLineType::Addition | DiffLineType::Deletion
                ) {
                    continue;
                }
                records.push(RawLineRecord {
                    header,
                    old_lineno: line.old_lineno().map(|lineno| lineno as usize),
                    new_lineno: line.new_lineno().map(|lineno| lineno as usize),
                    text: String::from_utf8_lossy(line.content()).into_owned(),
                });
            }
        }

        trace!("libgit2 produced {} raw records", records.len());
        Ok(records)
    }
}
