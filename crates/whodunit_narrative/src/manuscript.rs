//! Compiled manuscript output.

use crate::{ChapterDraft, WorkflowSession};
use derive_getters::Getters;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, instrument};
use whodunit_error::{IoError, WhodunitResult, WorkflowError, WorkflowErrorKind};

/// File rendering of a [`Manuscript`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ManuscriptFormat {
    /// Markdown headings, critique appended.
    #[default]
    Markdown,
    /// Underlined headings, no critique.
    PlainText,
}

/// A finished book assembled from a session.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Manuscript {
    /// Book title
    title: String,
    /// Chapters in order
    chapters: Vec<ChapterDraft>,
    /// Editorial critique, if one was generated
    critique: Option<String>,
}

impl Manuscript {
    /// Assemble a manuscript from a session whose chapters are all drafted.
    pub fn compile(session: &WorkflowSession) -> Result<Self, WorkflowError> {
        if session.outline().is_none() {
            return Err(WorkflowError::new(WorkflowErrorKind::MissingStage(
                "outline".to_string(),
            )));
        }

        let missing = session.missing_chapters();
        if !missing.is_empty() {
            return Err(WorkflowError::new(WorkflowErrorKind::IncompleteDraft(
                missing,
            )));
        }

        Ok(Self {
            title: session.title(),
            chapters: session.drafts().into_iter().cloned().collect(),
            critique: session.critique().clone(),
        })
    }

    /// Markdown with a title heading and one section per chapter.
    ///
    /// The critique is appended as a separate section when requested.
    pub fn to_markdown(&self, include_critique: bool) -> String {
        let mut out = format!("# {}\n", self.title);
        for chapter in &self.chapters {
            let _ = write!(
                out,
                "\n## Chapter {}: {}\n\n{}\n",
                chapter.number(),
                chapter.title(),
                chapter.text().trim()
            );
        }

        if let Some(critique) = self.critique.as_ref().filter(|_| include_critique) {
            let _ = write!(out, "\n---\n\n## Editorial Critique\n\n{}\n", critique.trim());
        }
        out
    }

    /// Plain text with underlined headings and no markup.
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("{}\n{}\n", self.title, "=".repeat(self.title.chars().count()));
        for chapter in &self.chapters {
            let heading = format!("Chapter {}: {}", chapter.number(), chapter.title());
            let _ = write!(
                out,
                "\n{}\n{}\n\n{}\n",
                heading,
                "-".repeat(heading.chars().count()),
                chapter.text().trim()
            );
        }
        out
    }

    /// Words of chapter prose, excluding headings and critique.
    pub fn word_count(&self) -> usize {
        self.chapters.iter().map(ChapterDraft::word_count).sum()
    }

    /// The manuscript rendered as `format`.
    pub fn render(&self, format: ManuscriptFormat) -> String {
        match format {
            ManuscriptFormat::Markdown => self.to_markdown(true),
            ManuscriptFormat::PlainText => self.to_plain_text(),
        }
    }

    /// Write the rendering to `path`, creating parent directories as needed.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), %format))]
    pub fn write(&self, path: impl AsRef<Path>, format: ManuscriptFormat) -> WhodunitResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| IoError::new(parent.display().to_string(), e.to_string()))?;
        }
        std::fs::write(path, self.render(format))
            .map_err(|e| IoError::new(path.display().to_string(), e.to_string()))?;

        info!(
            chapters = self.chapters.len(),
            words = self.word_count(),
            "Manuscript written"
        );
        Ok(())
    }
}
