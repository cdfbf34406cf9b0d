use inline_diff::{DiffError, DiffStats, Hunk, HunkHeader, HunkKind};
use pretty_assertions::assert_eq;

fn lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

#[test]
fn test_added_hunk_rows() {
    // Two lines inserted after line 2
    let hunk = Hunk::new(HunkHeader::new(2, 0, 3, 2)).unwrap();

    assert_eq!(hunk.kind, HunkKind::Added);
    assert_eq!(hunk.start_row, 2);
    assert_eq!(hunk.end_row, 3);
    assert!(hunk.contains_row(2));
    assert!(hunk.contains_row(3));
    assert!(!hunk.contains_row(4));
}

#[test]
fn test_removed_hunk_is_anchored_to_row_above() {
    // Two lines deleted after working line 4
    let hunk = Hunk::new(HunkHeader::new(5, 2, 4, 0)).unwrap();

    assert_eq!(hunk.kind, HunkKind::Removed);
    assert_eq!(hunk.start_row, 3);
    assert_eq!(hunk.end_row, 3);
    assert_eq!(hunk.insertion_row(), 4);
    assert!(hunk.contains_row(3));
    assert!(!hunk.contains_row(4));
}

#[test]
fn test_removed_hunk_at_top_of_document() {
    let hunk = Hunk::new(HunkHeader::new(1, 1, 0, 0)).unwrap();

    assert_eq!(hunk.start_row, 0);
    assert_eq!(hunk.end_row, 0);
    assert_eq!(hunk.insertion_row(), 0);
}

#[test]
fn test_modified_hunk_rows() {
    let hunk = Hunk::new(HunkHeader::new(5, 3, 5, 4)).unwrap();

    assert_eq!(hunk.kind, HunkKind::Modified);
    assert_eq!(hunk.start_row, 4);
    assert_eq!(hunk.end_row, 7);
    assert_eq!(hunk.rows(), 4..=7);
    assert_eq!(hunk.insertion_row(), 4);
}

#[test]
fn test_empty_header_is_rejected() {
    let result = Hunk::new(HunkHeader::new(3, 0, 3, 0));
    assert!(matches!(result, Err(DiffError::EmptyHunk(_))));
}

#[test]
fn test_pairable() {
    let mut hunk = Hunk::new(HunkHeader::new(1, 2, 1, 2)).unwrap();
    hunk.removed_lines = lines(&["a\n", "b\n"]);
    hunk.added_lines = lines(&["A\n", "B\n"]);
    assert!(hunk.is_pairable());
    assert_eq!(hunk.line_delta(), 0);

    hunk.added_lines.pop();
    assert!(!hunk.is_pairable());
    assert_eq!(hunk.line_delta(), -1);

    let mut added = Hunk::new(HunkHeader::new(0, 0, 1, 1)).unwrap();
    added.added_lines = lines(&["x\n"]);
    assert!(!added.is_pairable());
}

#[test]
fn test_removed_text() {
    let mut hunk = Hunk::new(HunkHeader::new(1, 2, 0, 0)).unwrap();
    hunk.removed_lines = lines(&["first\n", "second\r\n"]);

    assert_eq!(hunk.removed_text(), "first\nsecond\r\n");
    assert_eq!(hunk.removed_text_for_display().unwrap(), "first\nsecond");
}

#[test]
fn test_removed_text_for_display_on_added_hunk() {
    let mut hunk = Hunk::new(HunkHeader::new(0, 0, 1, 1)).unwrap();
    hunk.added_lines = lines(&["new\n"]);

    let err = hunk.removed_text_for_display().unwrap_err();
    assert!(matches!(
        err,
        DiffError::InvalidHunkOperation {
            kind: HunkKind::Added,
            ..
        }
    ));
}

#[test]
fn test_kind_display() {
    assert_eq!(HunkKind::Added.to_string(), "Added");
    assert_eq!(HunkKind::Removed.to_string(), "Removed");
    assert_eq!(HunkKind::Modified.to_string(), "Modified");
    assert_eq!(HunkHeader::new(3, 0, 4, 2).to_string(), "@@ -3,0 +4,2 @@");
}

#[test]
fn test_stats() {
    let mut added = Hunk::new(HunkHeader::new(0, 0, 1, 2)).unwrap();
    added.added_lines = lines(&["a\n", "b\n"]);
    let mut removed = Hunk::new(HunkHeader::new(5, 1, 6, 0)).unwrap();
    removed.removed_lines = lines(&["c\n"]);

    let stats = DiffStats::from_hunks([&added, &removed]);
    assert_eq!(
        stats,
        DiffStats {
            hunks: 2,
            added_lines: 2,
            removed_lines: 1,
        }
    );
    assert!(stats.has_changes());
    assert!(!DiffStats::default().has_changes());
}
