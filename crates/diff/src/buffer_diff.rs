use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use derive_more::Display;
use log::{debug, trace};
use ropey::Rope;

use crate::diff_hunk::{DiffStats, Hunk, HunkKind};
use crate::error::DiffResult;
use crate::hunk_builder::compute_hunks_with;
use crate::line_differ::SimilarLineDiffer;
use crate::options::DiffOptions;
use crate::raw_line::LineDiffer;
use crate::revert::{compute_revert_edit, copy_removed_text, BufferRange, RevertEdit};
use crate::subscriptions::Subscriptions;

/// Stable identity of a hunk within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "#{}", _0)]
pub struct HunkId(u64);

/// A hunk as tracked by a [`DiffSession`]
#[derive(Debug, Clone)]
pub struct SessionHunk {
    id: HunkId,
    hunk: Arc<Hunk>,
    valid: bool,
}

impl SessionHunk {
    pub fn id(&self) -> HunkId {
        self.id
    }

    pub fn hunk(&self) -> &Arc<Hunk> {
        &self.hunk
    }

    /// False once an edit touched the hunk's rows
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Rows used to decide whether an edit touches the hunk; a removed hunk
    /// also owns the row its text is restored before
    fn touched_rows(&self) -> (usize, usize) {
        match self.hunk.kind {
            HunkKind::Removed => (self.hunk.start_row, self.hunk.start_row + 1),
            HunkKind::Added | HunkKind::Modified => (self.hunk.start_row, self.hunk.end_row),
        }
    }
}

impl Deref for SessionHunk {
    type Target = Hunk;

    fn deref(&self) -> &Hunk {
        &self.hunk
    }
}

/// An edit the host applied to the working text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: BufferRange,
    pub text: String,
}

impl TextEdit {
    pub fn new(range: BufferRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }
}

/// Which hunks survived a recomputation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Hunks kept with their identity; the host can keep their decorations
    pub retained: Vec<HunkId>,
    /// Hunks that appeared in this computation
    pub created: Vec<HunkId>,
    /// Hunks that are gone; the host should tear down their decorations
    pub destroyed: Vec<HunkId>,
}

impl RefreshOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }
}

/// A snapshot of the session's texts that can be diffed away from the session
#[derive(Clone)]
pub struct RecomputeTicket {
    generation: u64,
    base_text: String,
    working_text: String,
    options: DiffOptions,
    differ: Arc<dyn LineDiffer>,
}

impl RecomputeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the hunk computation for this snapshot
    pub fn compute(&self) -> DiffResult<ComputedHunks> {
        let hunks = compute_hunks_with(
            self.differ.as_ref(),
            &self.base_text,
            &self.working_text,
            &self.options,
        )?;
        Ok(ComputedHunks {
            generation: self.generation,
            hunks,
        })
    }
}

/// The result of a [`RecomputeTicket`], tagged with the generation it was taken at
#[derive(Debug, Clone)]
pub struct ComputedHunks {
    generation: u64,
    hunks: Vec<Hunk>,
}

impl ComputedHunks {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }
}

/// The diff state of one open document.
///
/// Hunks are recomputed lazily: edits and [`DiffSession::invalidate`] only mark
/// the session stale, and the next [`DiffSession::get`] recomputes once. Hunks
/// an edit did not touch keep their [`HunkId`] across the recomputation.
pub struct DiffSession {
    /// The diff base (old side)
    base_text: Rope,

    /// The working text (new side)
    working_text: Rope,

    options: DiffOptions,
    differ: Arc<dyn LineDiffer>,

    /// `None` until the first computation
    hunks: Option<Vec<SessionHunk>>,
    stale: bool,

    /// Bumped on every change that makes in-flight computations obsolete
    generation: u64,
    next_id: u64,
    update_pending: bool,
    recompute_count: usize,
    subscriptions: Subscriptions,
}

impl DiffSession {
    /// Create a session diffing `working_text` against `base_text`
    pub fn new(base_text: &str, working_text: &str, options: DiffOptions) -> Self {
        Self {
            base_text: Rope::from_str(base_text),
            working_text: Rope::from_str(working_text),
            options,
            differ: Arc::new(SimilarLineDiffer),
            hunks: None,
            stale: true,
            generation: 0,
            next_id: 0,
            update_pending: false,
            recompute_count: 0,
            subscriptions: Subscriptions::new(),
        }
    }

    /// Use a different raw diff source
    pub fn with_differ(mut self, differ: Arc<dyn LineDiffer>) -> Self {
        self.differ = differ;
        self.reset();
        self
    }

    /// Get the base text
    pub fn base_text(&self) -> &Rope {
        &self.base_text
    }

    /// Get the working text
    pub fn working_text(&self) -> &Rope {
        &self.working_text
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Number of computations started so far
    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    pub fn is_stale(&self) -> bool {
        self.stale || self.hunks.is_none()
    }

    /// Hunks from the last computation, without recomputing
    pub fn cached_hunks(&self) -> Option<&[SessionHunk]> {
        self.hunks.as_deref()
    }

    /// Hunks an edit has touched since the last computation
    pub fn invalidated_hunks(&self) -> impl Iterator<Item = &SessionHunk> {
        self.hunks
            .iter()
            .flatten()
            .filter(|session_hunk| !session_hunk.valid)
    }

    /// Mark the hunks stale; they stay available until the next computation
    pub fn invalidate(&mut self) {
        self.stale = true;
        self.generation += 1;
        trace!("diff session invalidated (generation {})", self.generation);
    }

    /// Invalidate every hunk; nothing is carried over to the next computation
    fn reset(&mut self) {
        if let Some(hunks) = self.hunks.as_mut() {
            for session_hunk in hunks.iter_mut() {
                session_hunk.valid = false;
            }
        }
        self.invalidate();
    }

    /// Compare against a different base text, such as an older revision
    pub fn set_base(&mut self, base_text: &str) {
        debug!("diff base replaced ({} bytes)", base_text.len());
        self.base_text = Rope::from_str(base_text);
        self.reset();
    }

    pub fn set_options(&mut self, options: DiffOptions) {
        if options != self.options {
            self.options = options;
            self.reset();
        }
    }

    /// Replace the whole working text; hunks that come out identical keep their id
    pub fn set_working_text(&mut self, working_text: &str) {
        self.working_text = Rope::from_str(working_text);
        self.invalidate();
    }

    /// Apply a localized edit to the working text.
    ///
    /// Hunks whose rows intersect the edit are invalidated, hunks below it are
    /// moved by the number of rows the edit added or removed.
    pub fn apply_edit(&mut self, edit: &TextEdit) {
        let start = edit.range.start.to_char_idx(&self.working_text);
        let end = edit.range.end.to_char_idx(&self.working_text).max(start);
        // rows of the clamped range, which is what actually gets replaced
        let first_row = self.working_text.char_to_line(start);
        let old_last_row = self.working_text.char_to_line(end);
        self.working_text.remove(start..end);
        self.working_text.insert(start, &edit.text);

        let new_last_row = first_row + edit.text.matches('\n').count();
        let delta = new_last_row as isize - old_last_row as isize;

        if let Some(hunks) = self.hunks.as_mut() {
            for session_hunk in hunks.iter_mut() {
                let (low, high) = session_hunk.touched_rows();
                if high >= first_row && low <= old_last_row {
                    session_hunk.valid = false;
                } else if low > old_last_row && delta != 0 {
                    session_hunk.hunk = Arc::new(session_hunk.hunk.shifted(delta));
                }
            }
        }
        trace!("edit at rows {}..={} moved following rows by {}", first_row, old_last_row, delta);
        self.invalidate();
    }

    /// Current hunks, recomputing first if the session is stale
    pub fn get(&mut self) -> DiffResult<&[SessionHunk]> {
        if self.is_stale() {
            self.refresh()?;
        }
        Ok(self.hunks.as_deref().unwrap_or(&[]))
    }

    /// Recompute if stale and report which hunks changed identity
    pub fn refresh(&mut self) -> DiffResult<RefreshOutcome> {
        if !self.is_stale() {
            let retained = self.hunks.iter().flatten().map(|h| h.id).collect();
            return Ok(RefreshOutcome {
                retained,
                ..RefreshOutcome::default()
            });
        }
        let computed = self.begin_recompute().compute()?;
        Ok(self.finish_recompute(computed).unwrap_or_default())
    }

    /// Snapshot the texts for a computation that may run elsewhere
    pub fn begin_recompute(&mut self) -> RecomputeTicket {
        self.recompute_count += 1;
        trace!("recompute #{} at generation {}", self.recompute_count, self.generation);
        RecomputeTicket {
            generation: self.generation,
            base_text: self.base_text.to_string(),
            working_text: self.working_text.to_string(),
            options: self.options.clone(),
            differ: self.differ.clone(),
        }
    }

    /// Install a finished computation unless the session changed after its ticket was taken
    pub fn finish_recompute(&mut self, computed: ComputedHunks) -> Option<RefreshOutcome> {
        if computed.generation != self.generation {
            debug!(
                "discarding superseded diff (generation {}, current {})",
                computed.generation, self.generation
            );
            return None;
        }

        let mut outcome = RefreshOutcome::default();
        let mut reusable: HashMap<usize, SessionHunk> = HashMap::new();
        for previous in self.hunks.take().into_iter().flatten() {
            if previous.valid {
                reusable.insert(previous.hunk.header.new_start, previous);
            } else {
                outcome.destroyed.push(previous.id);
            }
        }

        let mut hunks = Vec::with_capacity(computed.hunks.len());
        for fresh in computed.hunks {
            match reusable.remove(&fresh.header.new_start) {
                Some(previous) if *previous.hunk == fresh => {
                    outcome.retained.push(previous.id);
                    hunks.push(previous);
                }
                other => {
                    if let Some(previous) = other {
                        outcome.destroyed.push(previous.id);
                    }
                    let id = self.allocate_id();
                    outcome.created.push(id);
                    hunks.push(SessionHunk {
                        id,
                        hunk: Arc::new(fresh),
                        valid: true,
                    });
                }
            }
        }
        outcome.destroyed.extend(reusable.into_values().map(|previous| previous.id));
        outcome.destroyed.sort();

        debug!(
            "diff recomputed: {} retained, {} created, {} destroyed",
            outcome.retained.len(),
            outcome.created.len(),
            outcome.destroyed.len()
        );
        self.hunks = Some(hunks);
        self.stale = false;
        Some(outcome)
    }

    fn allocate_id(&mut self) -> HunkId {
        self.next_id += 1;
        HunkId(self.next_id)
    }

    fn index_containing_row(&mut self, row: usize) -> DiffResult<Option<usize>> {
        let hunks = self.get()?;
        let index = hunks.partition_point(|h| h.end_row < row);
        Ok(hunks
            .get(index)
            .filter(|h| h.contains_row(row))
            .map(|_| index))
    }

    fn index_near_cursor(&mut self, row: usize) -> DiffResult<Option<usize>> {
        if let Some(index) = self.index_containing_row(row)? {
            return Ok(Some(index));
        }
        // a cursor on the row right above a modification, or right below a
        // deletion, counts as on it
        let hunks = self.get()?;
        Ok(hunks.iter().position(|h| match h.kind {
            HunkKind::Modified => h.start_row.checked_sub(1) == Some(row),
            HunkKind::Removed => row > 0 && h.header.new_start == row,
            HunkKind::Added => false,
        }))
    }

    /// The hunk whose rows contain `row`
    pub fn find_hunk_containing_row(&mut self, row: usize) -> DiffResult<Option<&SessionHunk>> {
        let index = self.index_containing_row(row)?;
        Ok(index.and_then(|index| self.hunks.as_ref()?.get(index)))
    }

    /// Like [`DiffSession::find_hunk_containing_row`], but also matches a
    /// modified hunk starting on the row below the cursor and a removed hunk
    /// whose lines were deleted just above the cursor.
    ///
    /// Two deletions can share row 0 (one above the first line, one below it);
    /// the first is found from row 0 and the second from row 1.
    pub fn find_hunk_near_cursor(&mut self, row: usize) -> DiffResult<Option<&SessionHunk>> {
        let index = self.index_near_cursor(row)?;
        Ok(index.and_then(|index| self.hunks.as_ref()?.get(index)))
    }

    /// The removed text of the hunk near the cursor
    pub fn copy_removed_text_at(&mut self, row: usize) -> DiffResult<Option<String>> {
        self.find_hunk_near_cursor(row)?
            .map(|session_hunk| copy_removed_text(session_hunk))
            .transpose()
    }

    /// Revert the hunk near the cursor in the session's working text.
    ///
    /// The hunk is dropped and the hunks below it are moved, without a
    /// recomputation. Returns the edit so the host can apply it to its buffer.
    pub fn revert_hunk_at(&mut self, row: usize) -> DiffResult<Option<RevertEdit>> {
        let Some(index) = self.index_near_cursor(row)? else {
            return Ok(None);
        };
        let Some(hunks) = self.hunks.as_mut() else {
            return Ok(None);
        };

        let reverted = hunks.remove(index);
        let edit = compute_revert_edit(&reverted.hunk);
        edit.apply(&mut self.working_text);

        let delta = -reverted.hunk.line_delta();
        if delta != 0 {
            for session_hunk in hunks[index..].iter_mut() {
                session_hunk.hunk = Arc::new(session_hunk.hunk.shifted(delta));
            }
        }
        // computations started before the revert saw the old working text
        self.generation += 1;

        debug!("reverted {} hunk {} at {}", reverted.hunk.kind, reverted.id, edit.range);
        Ok(Some(edit))
    }

    /// Line counts across the current hunks
    pub fn stats(&mut self) -> DiffResult<DiffStats> {
        let hunks = self.get()?;
        Ok(DiffStats::from_hunks(hunks.iter().map(|h| h.hunk.as_ref())))
    }

    /// Ask for a recomputation once the host's edits settle
    pub fn schedule_update(&mut self) {
        self.update_pending = true;
    }

    pub fn cancel_update(&mut self) {
        self.update_pending = false;
    }

    pub fn is_update_pending(&self) -> bool {
        self.update_pending
    }

    /// Consume a scheduled update; any number of schedules yield one `true`
    pub fn take_pending_update(&mut self) -> bool {
        let pending = self.update_pending;
        if pending {
            self.update_pending = false;
            self.invalidate();
        }
        pending
    }

    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    /// Tear the session down, disposing its subscriptions
    pub fn destroy(mut self) {
        debug!("destroying diff session with {} subscriptions", self.subscriptions.len());
        self.subscriptions.dispose();
    }
}
