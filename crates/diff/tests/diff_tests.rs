use inline_diff::{
    build_hunks, compute_hunks, ChangeRange, DiffError, DiffOptions, HunkHeader, HunkKind,
    IntraLineMode, LineDiffer, RawLineRecord, SimilarLineDiffer,
};
use pretty_assertions::assert_eq;

fn options() -> DiffOptions {
    DiffOptions::default()
}

#[test]
fn test_identical_texts() {
    let text = "Line 1\nLine 2\nLine 3\n";
    assert!(compute_hunks(text, text, &options()).unwrap().is_empty());
    assert!(compute_hunks("", "", &options()).unwrap().is_empty());
}

#[test]
fn test_pure_addition() {
    let hunks = compute_hunks("", "x\ny\n", &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    let hunk = &hunks[0];
    assert_eq!(hunk.kind, HunkKind::Added);
    assert_eq!(hunk.start_row, 0);
    assert_eq!(hunk.end_row, hunk.start_row + 1);
    assert!(!hunk.is_pairable());
    assert_eq!(hunk.added_lines, vec!["x\n", "y\n"]);
    assert!(hunk.removed_lines.is_empty());
    assert_eq!(hunk.intra_line, None);
}

#[test]
fn test_pure_removal() {
    let hunks = compute_hunks("x\n", "", &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].kind, HunkKind::Removed);
    assert_eq!(hunks[0].header, HunkHeader::new(1, 1, 0, 0));
    assert_eq!(hunks[0].removed_lines, vec!["x\n"]);
}

#[test]
fn test_modified_line_in_middle() {
    let old = "Line 1\nLine 2\nLine 3\n";
    let new = "Line 1\nLine X\nLine 3\n";

    let hunks = compute_hunks(old, new, &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    let hunk = &hunks[0];
    assert_eq!(hunk.kind, HunkKind::Modified);
    assert_eq!(hunk.header, HunkHeader::new(2, 1, 2, 1));
    assert_eq!((hunk.start_row, hunk.end_row), (1, 1));
    assert!(hunk.is_pairable());

    let changes = hunk.intra_line.as_ref().unwrap();
    assert_eq!(changes.mode, IntraLineMode::Relative);
    assert_eq!(changes.lines[0].removed, vec![ChangeRange::new(5, 1)]);
    assert_eq!(changes.lines[0].added, vec![ChangeRange::new(5, 1)]);
}

#[test]
fn test_deleted_line_in_middle() {
    let hunks = compute_hunks("a\nb\nc\n", "a\nc\n", &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].kind, HunkKind::Removed);
    // numbered by the working line above the deletion
    assert_eq!(hunks[0].header, HunkHeader::new(2, 1, 1, 0));
    assert_eq!((hunks[0].start_row, hunks[0].end_row), (0, 0));
}

#[test]
fn test_added_line_in_middle() {
    let hunks = compute_hunks("a\nc\n", "a\nb\nc\n", &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].kind, HunkKind::Added);
    assert_eq!(hunks[0].header, HunkHeader::new(1, 0, 2, 1));
    assert_eq!((hunks[0].start_row, hunks[0].end_row), (1, 1));
}

#[test]
fn test_multiple_hunks_are_sorted() {
    let old = "a\nb\nc\nd\ne\nf\ng\n";
    let new = "a\nB\nc\nd\nf\ng\nh\n";

    let hunks = compute_hunks(old, new, &options()).unwrap();
    let kinds: Vec<HunkKind> = hunks.iter().map(|h| h.kind).collect();

    assert_eq!(
        kinds,
        vec![HunkKind::Modified, HunkKind::Removed, HunkKind::Added]
    );
    assert_eq!(hunks[0].start_row, 1);
    assert_eq!(hunks[1].start_row, 3);
    assert_eq!(hunks[2].start_row, 6);
}

#[test]
fn test_unpaired_modification_has_no_intra_line_changes() {
    let hunks = compute_hunks("a\nb\nc\n", "a\nX\nY\nc\n", &options()).unwrap();

    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].kind, HunkKind::Modified);
    assert_eq!(hunks[0].end_row, 2);
    assert!(!hunks[0].is_pairable());
    assert_eq!(hunks[0].intra_line, None);
}

#[test]
fn test_intra_line_mode_off() {
    let options = options().intra_line(IntraLineMode::Off);
    let hunks = compute_hunks("a\nb\n", "a\nc\n", &options).unwrap();

    assert!(hunks[0].is_pairable());
    assert_eq!(hunks[0].intra_line, None);
}

#[test]
fn test_ignore_eol_whitespace() {
    let old = "fn main() {  \n    run();\n}\n";
    let new = "fn main() {\n    run();\n}\n";

    let strict = compute_hunks(old, new, &options()).unwrap();
    assert_eq!(strict.len(), 1);

    let relaxed = compute_hunks(old, new, &options().ignore_eol_whitespace(true)).unwrap();
    assert!(relaxed.is_empty());
}

#[test]
fn test_similar_differ_records() {
    let records = SimilarLineDiffer
        .diff_lines("a\nb\n", "a\nB\nc\n", &options())
        .unwrap();

    let header = HunkHeader::new(2, 1, 2, 2);
    assert_eq!(
        records,
        vec![
            RawLineRecord::removed(header, 2, "b\n"),
            RawLineRecord::added(header, 2, "B\n"),
            RawLineRecord::added(header, 3, "c\n"),
        ]
    );
}

#[test]
fn test_build_hunks_from_empty_stream() {
    assert!(build_hunks(&[]).unwrap().is_empty());
}

#[test]
fn test_build_hunks_groups_by_header() {
    let first = HunkHeader::new(2, 1, 2, 1);
    let second = HunkHeader::new(5, 0, 6, 2);
    let records = vec![
        RawLineRecord::removed(first, 2, "old\n"),
        RawLineRecord::added(first, 2, "new\n"),
        RawLineRecord::added(second, 6, "x\n"),
        RawLineRecord::added(second, 7, "y\n"),
    ];

    let hunks = build_hunks(&records).unwrap();

    assert_eq!(hunks.len(), 2);
    assert_eq!(hunks[0].kind, HunkKind::Modified);
    assert_eq!(hunks[0].removed_lines, vec!["old\n"]);
    assert_eq!(hunks[0].added_lines, vec!["new\n"]);
    assert_eq!(hunks[1].kind, HunkKind::Added);
    assert_eq!((hunks[1].start_row, hunks[1].end_row), (5, 6));
}

#[test]
fn test_build_hunks_rejects_out_of_order_headers() {
    let later = HunkHeader::new(8, 1, 8, 1);
    let earlier = HunkHeader::new(2, 1, 2, 1);
    let records = vec![
        RawLineRecord::removed(later, 8, "a\n"),
        RawLineRecord::added(later, 8, "b\n"),
        RawLineRecord::removed(earlier, 2, "c\n"),
        RawLineRecord::added(earlier, 2, "d\n"),
    ];

    let err = build_hunks(&records).unwrap_err();
    assert!(matches!(
        err,
        DiffError::HunkOutOfOrder {
            previous: 8,
            next: 2
        }
    ));
}

#[test]
fn test_build_hunks_rejects_overlapping_headers() {
    let first = HunkHeader::new(1, 0, 1, 3);
    let overlapping = HunkHeader::new(1, 1, 2, 1);
    let records = vec![
        RawLineRecord::added(first, 1, "a\n"),
        RawLineRecord::added(first, 2, "b\n"),
        RawLineRecord::added(first, 3, "c\n"),
        RawLineRecord::removed(overlapping, 1, "d\n"),
        RawLineRecord::added(overlapping, 2, "e\n"),
    ];

    assert!(matches!(
        build_hunks(&records),
        Err(DiffError::HunkOutOfOrder { .. })
    ));
}

#[test]
fn test_build_hunks_rejects_record_without_origin() {
    let header = HunkHeader::new(1, 1, 1, 1);
    let record = RawLineRecord {
        header,
        old_lineno: None,
        new_lineno: None,
        text: "orphan\n".to_string(),
    };

    assert!(matches!(
        build_hunks(&[record]),
        Err(DiffError::MissingLineOrigin { .. })
    ));
}

#[test]
fn test_build_hunks_rejects_count_mismatch() {
    let header = HunkHeader::new(1, 2, 1, 1);
    let records = vec![
        RawLineRecord::removed(header, 1, "a\n"),
        RawLineRecord::added(header, 1, "b\n"),
    ];

    let err = build_hunks(&records).unwrap_err();
    assert!(matches!(
        err,
        DiffError::HunkLineCountMismatch {
            removed: 1,
            added: 1,
            ..
        }
    ));
}

#[test]
fn test_build_hunks_with_huge_counts_reports_mismatch() {
    let header = HunkHeader::new(1, 0, 1, usize::MAX / 2);
    let records = vec![RawLineRecord::added(header, 1, "x\n")];

    let err = build_hunks(&records).unwrap_err();
    assert!(matches!(
        err,
        DiffError::HunkLineCountMismatch {
            removed: 0,
            added: 1,
            ..
        }
    ));
}

#[test]
fn test_build_hunks_rejects_rows_past_the_end() {
    let header = HunkHeader::new(1, 0, usize::MAX, 3);
    let records = vec![RawLineRecord::added(header, usize::MAX, "x\n")];

    let err = build_hunks(&records).unwrap_err();
    assert!(matches!(err, DiffError::HunkOutOfRange(h) if h == header));
}

#[test]
fn test_compute_is_idempotent() {
    let old = "one\ntwo\nthree\nfour\n";
    let new = "one\n2\nthree\nfive\nsix\n";

    let first = compute_hunks(old, new, &options()).unwrap();
    let second = compute_hunks(old, new, &options()).unwrap();
    assert_eq!(first, second);
}
