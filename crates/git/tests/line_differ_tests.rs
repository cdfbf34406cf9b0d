use git::GitLineDiffer;
use inline_diff::{
    compute_hunks, compute_hunks_with, DiffOptions, DiffSession, HunkHeader, HunkKind,
    LineDiffer, RawLineRecord,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_zero_context_records() {
    let records = GitLineDiffer
        .diff_lines("a\nb\nc\n", "a\nB\nc\nd\n", &DiffOptions::default())
        .unwrap();

    let modified = HunkHeader::new(2, 1, 2, 1);
    let added = HunkHeader::new(3, 0, 4, 1);
    assert_eq!(
        records,
        vec![
            RawLineRecord::removed(modified, 2, "b\n"),
            RawLineRecord::added(modified, 2, "B\n"),
            RawLineRecord::added(added, 4, "d\n"),
        ]
    );
}

#[test]
fn test_matches_in_process_differ() {
    let cases = [
        ("", "x\ny\n"),
        ("x\n", ""),
        ("a\nb\nc\n", "a\nc\n"),
        ("a\nb\nc\n", "c\n"),
        ("a\nc\n", "a\nb\nc\n"),
        ("one\ntwo\nthree\n", "one\n2\nthree\nfour\n"),
    ];
    let options = DiffOptions::default();

    for (old, new) in cases {
        assert_eq!(
            compute_hunks_with(&GitLineDiffer, old, new, &options).unwrap(),
            compute_hunks(old, new, &options).unwrap(),
            "{:?} -> {:?}",
            old,
            new
        );
    }
}

#[test]
fn test_missing_final_newline() {
    let hunks =
        compute_hunks_with(&GitLineDiffer, "a\nb", "a\nc", &DiffOptions::default()).unwrap();

    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].removed_lines, vec!["b"]);
    assert_eq!(hunks[0].added_lines, vec!["c"]);
}

#[test]
fn test_ignore_eol_whitespace() {
    let old = "let a = 1;   \nlet b = 2;\n";
    let new = "let a = 1;\nlet b = 3;\n";

    let strict = compute_hunks_with(&GitLineDiffer, old, new, &DiffOptions::default()).unwrap();
    assert_eq!(strict.len(), 1);
    assert_eq!(strict[0].start_row, 0);

    let relaxed = compute_hunks_with(
        &GitLineDiffer,
        old,
        new,
        &DiffOptions::default().ignore_eol_whitespace(true),
    )
    .unwrap();
    assert_eq!(relaxed.len(), 1);
    assert_eq!(relaxed[0].kind, HunkKind::Modified);
    assert_eq!(relaxed[0].start_row, 1);
}

#[test]
fn test_session_with_git_differ() {
    let mut session = DiffSession::new("a\nb\n", "a\nB\n", DiffOptions::default())
        .with_differ(Arc::new(GitLineDiffer));

    let hunks = session.get().unwrap();
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].kind, HunkKind::Modified);
}
