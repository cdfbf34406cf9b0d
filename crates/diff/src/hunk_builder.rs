use log::trace;
use rayon::prelude::*;

use crate::diff_hunk::Hunk;
use crate::error::{DiffError, DiffResult};
use crate::intra_line::compute_intra_line_changes;
use crate::line_differ::SimilarLineDiffer;
use crate::options::{DiffOptions, IntraLineMode};
use crate::raw_line::{HunkHeader, LineDiffer, RawLineRecord};

/// Group raw line records into hunks sorted by their working row.
///
/// Records of one hunk must be contiguous and hunks must arrive in ascending,
/// non-overlapping `new_start` order; anything else is rejected as malformed
/// input rather than merged.
pub fn build_hunks(records: &[RawLineRecord]) -> DiffResult<Vec<Hunk>> {
    let mut hunks: Vec<Hunk> = Vec::new();
    let mut current: Option<Hunk> = None;

    for record in records {
        let starts_new_hunk = match &current {
            None => true,
            Some(hunk) if hunk.header == record.header => false,
            Some(hunk) if record.header.new_start > last_new_line(&hunk.header) => true,
            Some(hunk) => {
                return Err(DiffError::HunkOutOfOrder {
                    previous: hunk.header.new_start,
                    next: record.header.new_start,
                })
            }
        };

        if starts_new_hunk {
            if let Some(hunk) = current.take() {
                hunks.push(close_hunk(hunk)?);
            }
            current = Some(Hunk::new(record.header)?);
        }

        if let Some(hunk) = current.as_mut() {
            if record.is_added()? {
                hunk.added_lines.push(record.text.clone());
            } else {
                hunk.removed_lines.push(record.text.clone());
            }
        }
    }

    if let Some(hunk) = current.take() {
        hunks.push(close_hunk(hunk)?);
    }

    trace!("built {} hunks from {} raw records", hunks.len(), records.len());
    Ok(hunks)
}

/// Last working line (1-based) a hunk touches; a removed hunk touches its anchor
fn last_new_line(header: &HunkHeader) -> usize {
    header
        .new_start
        .saturating_add(header.new_count.saturating_sub(1))
}

fn close_hunk(hunk: Hunk) -> DiffResult<Hunk> {
    if hunk.added_lines.len() != hunk.header.new_count
        || hunk.removed_lines.len() != hunk.header.old_count
    {
        return Err(DiffError::HunkLineCountMismatch {
            header: hunk.header,
            removed: hunk.removed_lines.len(),
            added: hunk.added_lines.len(),
        });
    }
    Ok(hunk)
}

/// Attach intra-line changes to every pairable hunk
pub fn annotate_intra_line(hunks: &mut [Hunk], mode: IntraLineMode) {
    hunks.par_iter_mut().for_each(|hunk| {
        hunk.intra_line = if hunk.is_pairable() {
            compute_intra_line_changes(mode, &hunk.removed_lines, &hunk.added_lines)
        } else {
            None
        };
    });
}

/// Compute the hunks between two texts with the in-process line differ
pub fn compute_hunks(old_text: &str, new_text: &str, options: &DiffOptions) -> DiffResult<Vec<Hunk>> {
    compute_hunks_with(&SimilarLineDiffer, old_text, new_text, options)
}

/// Compute the hunks between two texts with any raw diff source
pub fn compute_hunks_with(
    differ: &dyn LineDiffer,
    old_text: &str,
    new_text: &str,
    options: &DiffOptions,
) -> DiffResult<Vec<Hunk>> {
    let records = differ.diff_lines(old_text, new_text, options)?;
    let mut hunks = build_hunks(&records)?;
    annotate_intra_line(&mut hunks, options.intra_line);
    Ok(hunks)
}
