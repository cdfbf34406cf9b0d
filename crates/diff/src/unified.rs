//! Unified diff text as a raw diff source.
//!
//! A hunk header is `@@ -O,L +N,M @@` (counts default to 1), followed by lines
//! prefixed with `-`, `+` or ` `. Context lines split a textual hunk into
//! zero-context hunks so the result matches `git diff -U0` numbering.

use log::debug;

use crate::error::{DiffError, DiffResult};
use crate::intra_line::trim_line_terminator;
use crate::options::DiffOptions;
use crate::raw_line::{HunkHeader, LineDiffer, RawLineRecord};

/// Parse a unified diff of a single document into raw line records.
///
/// Lines before the first hunk header (`diff --git`, `index`, `---`, `+++`)
/// are skipped.
pub fn parse_unified_diff(text: &str) -> DiffResult<Vec<RawLineRecord>> {
    let mut parser = Parser::default();
    for (index, line) in text.split_inclusive('\n').enumerate() {
        parser.feed(index + 1, line)?;
    }
    parser.finish()
}

/// Parse one `@@ -O,L +N,M @@` header line
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let rest = line.strip_prefix("@@ -")?;
    let (old, rest) = rest.split_once(" +")?;
    let (new, _section) = rest.split_once(" @@")?;
    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some(HunkHeader::new(old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    let (start, count): (usize, usize) = match range.split_once(',') {
        Some((start, count)) => (start.parse().ok()?, count.parse().ok()?),
        None => (range.parse().ok()?, 1),
    };
    // the line after the range must still be numberable
    start.checked_add(count)?.checked_add(1)?;
    Some((start, count))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastLine {
    Removed,
    Added,
    Context,
}

/// The textual hunk currently being read
#[derive(Debug)]
struct Section {
    header: HunkHeader,
    old_next: usize,
    new_next: usize,
    old_remaining: usize,
    new_remaining: usize,
}

impl Section {
    fn new(header: HunkHeader) -> Self {
        let next = |start: usize, count: usize| if count == 0 { start + 1 } else { start };
        Self {
            header,
            old_next: next(header.old_start, header.old_count),
            new_next: next(header.new_start, header.new_count),
            old_remaining: header.old_count,
            new_remaining: header.new_count,
        }
    }

    fn is_complete(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }

    fn mismatch(&self) -> DiffError {
        DiffError::HunkLineCountMismatch {
            header: self.header,
            removed: self.header.old_count - self.old_remaining,
            added: self.header.new_count - self.new_remaining,
        }
    }
}

/// A run of changed lines between two context lines
#[derive(Debug, Default)]
struct Run {
    old_at: usize,
    new_at: usize,
    removed: Vec<(usize, String)>,
    added: Vec<(usize, String)>,
}

impl Run {
    fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

#[derive(Debug, Default)]
struct Parser {
    records: Vec<RawLineRecord>,
    section: Option<Section>,
    run: Run,
    last: Option<LastLine>,
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> DiffResult<()> {
        let in_body = self
            .section
            .as_ref()
            .map_or(false, |section| !section.is_complete());

        if !in_body {
            if line.starts_with("@@") {
                let header = parse_hunk_header(line).ok_or_else(|| DiffError::MalformedHeader {
                    line: line_no,
                    header: trim_line_terminator(line).to_string(),
                })?;
                self.flush_run();
                self.section = Some(Section::new(header));
                self.last = None;
                return Ok(());
            }
            return match (&self.section, line.chars().next()) {
                // preamble before the first hunk
                (None, _) => Ok(()),
                (Some(_), Some('\\')) => {
                    self.mark_no_newline();
                    Ok(())
                }
                (Some(_), prefix) => Err(DiffError::UnexpectedLinePrefix {
                    line: line_no,
                    prefix: prefix.unwrap_or('\n'),
                }),
            };
        }

        let Some(section) = self.section.as_mut() else {
            return Ok(());
        };
        let prefix = line.chars().next().unwrap_or('\n');
        let body = &line[prefix.len_utf8().min(line.len())..];

        match prefix {
            '-' => {
                if section.old_remaining == 0 {
                    return Err(section.mismatch());
                }
                if self.run.is_empty() {
                    self.run.old_at = section.old_next;
                    self.run.new_at = section.new_next;
                }
                self.run.removed.push((section.old_next, body.to_string()));
                section.old_next += 1;
                section.old_remaining -= 1;
                self.last = Some(LastLine::Removed);
            }
            '+' => {
                if section.new_remaining == 0 {
                    return Err(section.mismatch());
                }
                if self.run.is_empty() {
                    self.run.old_at = section.old_next;
                    self.run.new_at = section.new_next;
                }
                self.run.added.push((section.new_next, body.to_string()));
                section.new_next += 1;
                section.new_remaining -= 1;
                self.last = Some(LastLine::Added);
            }
            ' ' => {
                if section.old_remaining == 0 || section.new_remaining == 0 {
                    return Err(section.mismatch());
                }
                section.old_next += 1;
                section.new_next += 1;
                section.old_remaining -= 1;
                section.new_remaining -= 1;
                self.last = Some(LastLine::Context);
                self.flush_run();
            }
            '\\' => self.mark_no_newline(),
            other => {
                return Err(DiffError::UnexpectedLinePrefix {
                    line: line_no,
                    prefix: other,
                })
            }
        }
        Ok(())
    }

    /// `\ No newline at end of file` applies to the line before it
    fn mark_no_newline(&mut self) {
        let line = match self.last {
            Some(LastLine::Removed) => self.run.removed.last_mut(),
            Some(LastLine::Added) => self.run.added.last_mut(),
            Some(LastLine::Context) | None => None,
        };
        if let Some((_, text)) = line {
            let trimmed = trim_line_terminator(text).len();
            text.truncate(trimmed);
        }
    }

    fn flush_run(&mut self) {
        let run = std::mem::take(&mut self.run);
        if run.is_empty() {
            return;
        }
        // a side with no lines is numbered by the line before the change
        let start = |at: usize, lines: &[(usize, String)]| {
            if lines.is_empty() {
                at.saturating_sub(1)
            } else {
                at
            }
        };
        let header = HunkHeader::new(
            start(run.old_at, &run.removed),
            run.removed.len(),
            start(run.new_at, &run.added),
            run.added.len(),
        );
        for (lineno, text) in run.removed {
            self.records.push(RawLineRecord::removed(header, lineno, text));
        }
        for (lineno, text) in run.added {
            self.records.push(RawLineRecord::added(header, lineno, text));
        }
    }

    fn finish(mut self) -> DiffResult<Vec<RawLineRecord>> {
        if let Some(section) = &self.section {
            if !section.is_complete() {
                return Err(section.mismatch());
            }
        }
        self.flush_run();
        debug!("parsed {} raw records from unified diff", self.records.len());
        Ok(self.records)
    }
}

/// A raw diff source that obtains unified diff text from the host (for
/// example the output of `git diff --no-index`) and parses it
pub struct UnifiedDiffSource<F> {
    produce: F,
}

impl<F> UnifiedDiffSource<F>
where
    F: Fn(&str, &str, &DiffOptions) -> anyhow::Result<String> + Send + Sync,
{
    pub fn new(produce: F) -> Self {
        Self { produce }
    }
}

impl<F> LineDiffer for UnifiedDiffSource<F>
where
    F: Fn(&str, &str, &DiffOptions) -> anyhow::Result<String> + Send + Sync,
{
    fn diff_lines(
        &self,
        old_text: &str,
        new_text: &str,
        options: &DiffOptions,
    ) -> DiffResult<Vec<RawLineRecord>> {
        let text = (self.produce)(old_text, new_text, options)?;
        parse_unified_diff(&text)
    }
}
