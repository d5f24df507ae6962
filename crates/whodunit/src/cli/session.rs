//! Compile and status command handlers.

use anyhow::Context;
use std::path::Path;
use whodunit::{Manuscript, ManuscriptFormat, WorkflowSession};

/// Handles the compile command.
#[tracing::instrument(skip_all, fields(session = %session.display(), out = %out.display()))]
pub fn handle_compile_command(session: &Path, out: &Path, plain: bool) -> anyhow::Result<()> {
    let session = WorkflowSession::load(session)?;
    let manuscript = Manuscript::compile(&session)
        .context("Session is not ready to compile; run `whodunit write` to finish it")?;

    let format = if plain {
        ManuscriptFormat::PlainText
    } else {
        ManuscriptFormat::Markdown
    };
    manuscript.write(out, format)?;

    println!(
        "Compiled \"{}\": {} chapters, {} words -> {}",
        manuscript.title(),
        manuscript.chapters().len(),
        manuscript.word_count(),
        out.display()
    );
    Ok(())
}

/// Handles the status command.
pub fn handle_status_command(session: &Path) -> anyhow::Result<()> {
    let session = WorkflowSession::load(session)?;
    let planned = session.outline().as_ref().map_or(0, |o| o.len());
    let words: usize = session.drafts().iter().map(|d| d.word_count()).sum();

    println!("Title:      {}", session.title());
    println!("Next stage: {}", session.next_stage());
    println!("Idea:       {}", done(session.idea().is_some()));
    println!("Outline:    {}", done(session.outline().is_some()));
    println!(
        "Chapters:   {}/{} drafted, {} words",
        session.chapters().len(),
        planned,
        words
    );
    let missing = session.missing_chapters();
    if !missing.is_empty() && session.outline().is_some() {
        println!("Missing:    {:?}", missing);
    }
    println!("Critique:   {}", done(session.critique().is_some()));
    println!(
        "Tokens:     {} ({} in / {} out)",
        session.usage().total_tokens(),
        session.usage().input_tokens(),
        session.usage().output_tokens()
    );
    println!("Updated:    {}", session.updated_at().format("%Y-%m-%d %H:%M:%S UTC"));
    Ok(())
}

fn done(flag: bool) -> &'static str {
    if flag { "done" } else { "pending" }
}
