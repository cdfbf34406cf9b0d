use std::env;
use std::fs;

use anyhow::{Context, Result};
use inline_diff::{build_hunks, parse_unified_diff};

/// Print the hunks of a unified diff read from a file, e.g. the output of
/// `git diff -U0 -- path`
fn main() -> Result<()> {
    env_logger::init();

    let path = env::args().nth(1).context("Usage: unified_hunks <patch file>")?;
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;

    let records = parse_unified_diff(&text)?;
    let hunks = build_hunks(&records)?;

    println!("{} raw records, {} hunks", records.len(), hunks.len());
    for hunk in &hunks {
        println!(
            "{:<8} rows {:>4}..={:<4} -{} +{}",
            hunk.kind.to_string(),
            hunk.start_row,
            hunk.end_row,
            hunk.removed_lines.len(),
            hunk.added_lines.len()
        );
    }

    Ok(())
}
