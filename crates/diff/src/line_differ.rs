use std::ops::Range;
use std::time::Instant;

use log::{trace, warn};
use similar::{capture_diff_slices_deadline, Algorithm, DiffTag};

use crate::error::DiffResult;
use crate::options::DiffOptions;
use crate::raw_line::{HunkHeader, LineDiffer, RawLineRecord};

/// In-process raw diff source built on `similar`.
///
/// Produces zero-context hunks numbered like `git diff -U0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarLineDiffer;

impl LineDiffer for SimilarLineDiffer {
    fn diff_lines(
        &self,
        old_text: &str,
        new_text: &str,
        options: &DiffOptions,
    ) -> DiffResult<Vec<RawLineRecord>> {
        let old_lines: Vec<&str> = old_text.split_inclusive('\n').collect();
        let new_lines: Vec<&str> = new_text.split_inclusive('\n').collect();

        let ignore = options.ignore_eol_whitespace;
        let old_keys: Vec<&str> = old_lines.iter().map(|&line| line_key(line, ignore)).collect();
        let new_keys: Vec<&str> = new_lines.iter().map(|&line| line_key(line, ignore)).collect();

        let deadline = options.timeout.map(|timeout| Instant::now() + timeout);
        let ops = capture_diff_slices_deadline(Algorithm::Myers, &old_keys, &new_keys, deadline);

        let mut records = Vec::new();
        let mut pending: Option<(Range<usize>, Range<usize>)> = None;
        let mut approximated = 0;

        for op in &ops {
            if op.tag() == DiffTag::Equal {
                if let Some((old, new)) = pending.take() {
                    emit_hunk(&mut records, &old_lines, old, &new_lines, new);
                }
                if options.ignore_eol_whitespace {
                    approximated += op
                        .old_range()
                        .zip(op.new_range())
                        .filter(|&(o, n)| old_lines[o] != new_lines[n])
                        .count();
                }
                continue;
            }

            pending = Some(match pending.take() {
                Some((old, new)) => (old.start..op.old_range().end, new.start..op.new_range().end),
                None => (op.old_range(), op.new_range()),
            });
        }
        if let Some((old, new)) = pending.take() {
            emit_hunk(&mut records, &old_lines, old, &new_lines, new);
        }

        if approximated > 0 {
            warn!(
                "{} line(s) matched only up to end-of-line whitespace; reported text may differ from the base",
                approximated
            );
        }
        trace!("line diff produced {} raw records", records.len());
        Ok(records)
    }
}

fn line_key(line: &str, ignore_eol_whitespace: bool) -> &str {
    if ignore_eol_whitespace {
        line.trim_end()
    } else {
        line
    }
}

fn emit_hunk(
    records: &mut Vec<RawLineRecord>,
    old_lines: &[&str],
    old: Range<usize>,
    new_lines: &[&str],
    new: Range<usize>,
) {
    // a side with no lines is numbered by the line before the change
    let start = |range: &Range<usize>| {
        if range.is_empty() {
            range.start
        } else {
            range.start + 1
        }
    };
    let header = HunkHeader::new(start(&old), old.len(), start(&new), new.len());

    for index in old {
        records.push(RawLineRecord::removed(header, index + 1, old_lines[index]));
    }
    for index in new {
        records.push(RawLineRecord::added(header, index + 1, new_lines[index]));
    }
}
