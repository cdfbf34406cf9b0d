use anyhow::{Context, Result};
use git::{last_commit_by, GitLineDiffer, Repository};
use inline_diff::{DiffOptions, DiffSession};
use std::env;
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    // Get the file path and an optional revision from the command line
    let file_arg = env::args()
        .nth(1)
        .context("Usage: revision_hunks <file> [revision]")?;
    let file_path = std::fs::canonicalize(&file_arg)
        .with_context(|| format!("Failed to resolve {}", file_arg))?;
    let file_path = file_path.as_path();

    let repo = Repository::open(file_path.parent().unwrap_or(Path::new(".")))?;
    println!("Opened repository at: {}", repo.work_dir().display());

    let history = repo.file_history(file_path, 10)?;
    let user = repo.current_user()?;
    let preselected = last_commit_by(&history, &user);

    println!("\nHistory:");
    for commit in &history {
        let marker = if Some(commit) == preselected { ">" } else { " " };
        println!("{} {} <{}>", marker, commit, commit.author_email);
    }

    let revision = env::args().nth(2).unwrap_or_else(|| "HEAD".to_string());
    let base = repo.base_text(file_path, &revision)?;
    let working = repo
        .working_content(file_path)?
        .with_context(|| format!("{} does not exist", file_path.display()))?;

    let mut session = DiffSession::new(&base, &working, DiffOptions::default())
        .with_differ(Arc::new(GitLineDiffer));

    println!("\nHunks against {}:", revision);
    for hunk in session.get()? {
        println!(
            "{:<8} rows {}..={} {}",
            hunk.kind.to_string(),
            hunk.start_row,
            hunk.end_row,
            hunk.header
        );
    }
    let stats = session.stats()?;
    println!(
        "\n{} hunks, +{} -{}",
        stats.hunks, stats.added_lines, stats.removed_lines
    );

    Ok(())
}
