use anyhow::Result;
use inline_diff::{
    BufferRange, DiffOptions, DiffSession, HunkKind, IntraLineMode, Point, TextEdit,
};

fn main() -> Result<()> {
    env_logger::init();

    let base = "fn total(items: &[Item]) -> u32 {\n    let mut sum = 0;\n    for item in items {\n        sum += item.price;\n    }\n    sum\n}\n";
    let working = "fn total(items: &[Item]) -> u64 {\n    let mut sum = 0;\n    for item in items {\n        sum += item.price * item.quantity;\n    }\n    // done\n    sum\n}\n";

    let mut session = DiffSession::new(
        base,
        working,
        DiffOptions::default().intra_line(IntraLineMode::Word),
    );

    println!("=== Hunks ===");
    for hunk in session.get()? {
        println!(
            "{} {} rows {}..={} {}",
            hunk.id(),
            hunk.kind,
            hunk.start_row,
            hunk.end_row,
            hunk.header
        );
        if hunk.kind != HunkKind::Added {
            println!("  removed: {:?}", hunk.removed_text_for_display()?);
        }
        if let Some(changes) = &hunk.intra_line {
            for (row, range) in changes.added_ranges(hunk.start_row) {
                println!("  changed row {} cols {}..{}", row, range.start, range.end());
            }
        }
    }
    println!("{:?}", session.stats()?);

    println!("\n=== Edit on row 5 ===");
    session.apply_edit(&TextEdit::new(
        BufferRange::new(Point::new(5, 7), Point::new(5, 11)),
        "finished",
    ));
    let outcome = session.refresh()?;
    println!(
        "retained {:?}, created {:?}, destroyed {:?}",
        outcome.retained, outcome.created, outcome.destroyed
    );

    println!("\n=== Revert row 0 ===");
    if let Some(edit) = session.revert_hunk_at(0)? {
        println!("replace {} with {:?}", edit.range, edit.replacement);
    }
    println!("{}", session.working_text());

    Ok(())
}
