//! Write command handler.

use super::WriteArgs;
use anyhow::{Context, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use whodunit::{
    Manuscript, ManuscriptFormat, MysteryBrief, MysteryWorkflow, NewNovel, NovelRepository,
    QueuedDriver, SqliteNovelRepository, TaskQueue, WhodunitConfig, WorkflowSession,
};

/// Handles the write command.
///
/// Resumes the session file when it exists, otherwise starts from the brief.
/// The session is saved after every stage and again when a stage fails, so
/// rerunning the same command picks up where the last run stopped.
#[tracing::instrument(skip_all, fields(session = %args.session.display()))]
pub async fn handle_write_command(
    config: &WhodunitConfig,
    database_url: &str,
    args: WriteArgs,
) -> anyhow::Result<()> {
    let mut session = open_session(&args)?;
    if let Some(stage) = args.restart_from {
        info!(%stage, "Restarting from stage");
        session.reset_from(stage);
    }

    let api_key = config.api_key()?;
    let queue = Arc::new(TaskQueue::new(config.queue_config()));
    let driver = QueuedDriver::new(config.client(api_key)?, Arc::clone(&queue));
    let workflow = MysteryWorkflow::new(driver).with_settings(config.generation_settings());

    let session_path = args.session.clone();
    let outcome = workflow
        .run(&mut session, |stage, progress| {
            info!(
                %stage,
                next = %progress.next_stage(),
                tokens = progress.usage().total_tokens(),
                "Stage complete"
            );
            progress.save(&session_path)
        })
        .await;
    queue.shutdown().await;

    if let Err(e) = outcome {
        session
            .save(&args.session)
            .context("Failed to save session after error")?;
        let stats = queue.stats();
        warn!(
            succeeded = stats.succeeded(),
            failed = stats.failed(),
            "Writing stopped; rerun to resume"
        );
        return Err(e).with_context(|| format!("Stage '{}' failed", session.next_stage()));
    }

    let manuscript = Manuscript::compile(&session)?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{}.md", slug(manuscript.title()))));
    manuscript.write(&out, ManuscriptFormat::Markdown)?;

    if args.save {
        save_to_database(database_url, &session).await?;
    }

    println!(
        "Wrote \"{}\": {} chapters, {} words -> {}",
        manuscript.title(),
        manuscript.chapters().len(),
        manuscript.word_count(),
        out.display()
    );
    Ok(())
}

fn open_session(args: &WriteArgs) -> anyhow::Result<WorkflowSession> {
    if args.session.is_file() {
        let session = WorkflowSession::load(&args.session)?;
        info!(stage = %session.next_stage(), "Resuming session");
        if args.brief.is_some() || args.notes.is_some() {
            warn!("Session exists; --brief and --notes are ignored");
        }
        return Ok(session);
    }

    let Some(brief_path) = &args.brief else {
        bail!(
            "No session at {} and no --brief given",
            args.session.display()
        );
    };
    let mut brief = MysteryBrief::from_file(brief_path)?;
    if let Some(notes) = &args.notes {
        brief = brief.with_notes_file(notes)?;
    }
    Ok(WorkflowSession::new(brief))
}

async fn save_to_database(database_url: &str, session: &WorkflowSession) -> anyhow::Result<()> {
    let repo = SqliteNovelRepository::open(database_url)
        .with_context(|| format!("Failed to open database {}", database_url))?;

    let synopsis = session.idea().as_deref().and_then(synopsis_from_idea);
    let novel = repo
        .create_novel(&NewNovel::new(session.title(), synopsis))
        .await?;
    for member in session.brief().cast() {
        repo.add_character(*novel.id(), &member.to_new_character())
            .await?;
    }

    info!(
        id = novel.id(),
        cast = session.brief().cast().len(),
        "Novel saved"
    );
    println!("Saved as novel {}", novel.id());
    Ok(())
}

/// First paragraph of the idea that is not the title line.
fn synopsis_from_idea(idea: &str) -> Option<String> {
    idea.split("\n\n")
        .map(str::trim)
        .map(|p| {
            p.lines()
                .filter(|l| !l.trim().to_ascii_lowercase().trim_start_matches('*').starts_with("title:"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .map(|p| p.trim().to_string())
        .find(|p| !p.is_empty())
}

fn slug(title: &str) -> String {
    let mut out = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "manuscript".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_slug() {
        assert_eq!(slug("The Silent Hive!"), "the-silent-hive");
        assert_eq!(slug("  ??? "), "manuscript");
    }

    #[test]
    fn test_synopsis_skips_title_line() {
        let idea = "Title: The Silent Hive\nA beekeeper dies.\n\nMore detail.";
        assert_eq!(synopsis_from_idea(idea).as_deref(), Some("A beekeeper dies."));
    }

    #[test]
    fn test_open_session_needs_brief() {
        let dir = tempfile::tempdir().unwrap();
        let args = WriteArgs {
            brief: None,
            notes: None,
            session: dir.path().join("s.json"),
            out: None,
            restart_from: None,
            save: false,
        };
        assert!(open_session(&args).is_err());
    }

    #[test]
    fn test_open_session_resumes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let brief = MysteryBrief::builder().premise("p").build().unwrap();
        WorkflowSession::new(brief.clone()).save(&path).unwrap();

        let args = WriteArgs {
            brief: Some(Path::new("ignored.toml").to_path_buf()),
            notes: None,
            session: path,
            out: None,
            restart_from: None,
            save: false,
        };
        assert_eq!(open_session(&args).unwrap().brief(), &brief);
    }
}
