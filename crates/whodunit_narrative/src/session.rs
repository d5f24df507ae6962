//! Persistent record of workflow progress.

use crate::{ChapterPlan, MysteryBrief, Outline, prompts};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, instrument};
use whodunit_core::TokenUsage;
use whodunit_error::{IoError, JsonError, WhodunitResult};

/// Workflow stages in the order they run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stage {
    /// Develop the premise into a concept
    Idea,
    /// Plan the chapters
    Outline,
    /// Draft every chapter
    Chapters,
    /// Editorial critique of the draft
    Critique,
    /// Nothing left to do
    Complete,
}

/// One drafted chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterDraft {
    /// 1-based chapter number
    number: usize,
    /// Chapter title from the outline
    title: String,
    /// Prose
    text: String,
}

impl ChapterDraft {
    /// Creates a draft for a planned chapter.
    pub fn new(plan: &ChapterPlan, text: impl Into<String>) -> Self {
        Self {
            number: *plan.number(),
            title: plan.title().clone(),
            text: text.into(),
        }
    }

    /// Whitespace-delimited word count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Everything produced so far for one book.
///
/// Saved as JSON after every stage so an interrupted or failed run resumes
/// where it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct WorkflowSession {
    /// The author's brief
    brief: MysteryBrief,
    /// Generated concept
    idea: Option<String>,
    /// Parsed outline
    outline: Option<Outline>,
    /// Drafted chapters keyed by number
    chapters: BTreeMap<usize, ChapterDraft>,
    /// Editorial critique
    critique: Option<String>,
    /// Tokens spent so far
    #[serde(default)]
    usage: TokenUsage,
    /// When the session started
    created_at: DateTime<Utc>,
    /// Last change
    updated_at: DateTime<Utc>,
}

impl WorkflowSession {
    /// Start a session for a brief.
    pub fn new(brief: MysteryBrief) -> Self {
        let now = Utc::now();
        Self {
            brief,
            idea: None,
            outline: None,
            chapters: BTreeMap::new(),
            critique: None,
            usage: TokenUsage::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The stage that should run next.
    pub fn next_stage(&self) -> Stage {
        if self.idea.is_none() {
            Stage::Idea
        } else if self.outline.is_none() {
            Stage::Outline
        } else if !self.missing_chapters().is_empty() {
            Stage::Chapters
        } else if self.critique.is_none() {
            Stage::Critique
        } else {
            Stage::Complete
        }
    }

    /// True once every stage has run.
    pub fn is_complete(&self) -> bool {
        self.next_stage() == Stage::Complete
    }

    /// Outline chapters that have no draft yet, in order.
    pub fn missing_chapters(&self) -> Vec<usize> {
        self.outline
            .iter()
            .flat_map(|outline| outline.chapters())
            .map(|plan| *plan.number())
            .filter(|number| !self.chapters.contains_key(number))
            .collect()
    }

    /// Title from the brief, else from the idea, else a placeholder.
    pub fn title(&self) -> String {
        self.brief
            .title()
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.idea.as_deref().and_then(prompts::extract_title))
            .unwrap_or_else(|| "Untitled Mystery".to_string())
    }

    /// Drafts in chapter order.
    pub fn drafts(&self) -> Vec<&ChapterDraft> {
        self.chapters.values().collect()
    }

    /// Discard `stage` and everything after it so it runs again.
    pub fn reset_from(&mut self, stage: Stage) {
        if stage <= Stage::Idea {
            self.idea = None;
        }
        if stage <= Stage::Outline {
            self.outline = None;
        }
        if stage <= Stage::Chapters {
            self.chapters.clear();
        }
        if stage <= Stage::Critique {
            self.critique = None;
        }
        self.touch();
    }

    pub(crate) fn set_idea(&mut self, idea: String) {
        self.idea = Some(idea);
        self.touch();
    }

    pub(crate) fn set_outline(&mut self, outline: Outline) {
        self.outline = Some(outline);
        self.chapters.clear();
        self.touch();
    }

    pub(crate) fn insert_chapter(&mut self, draft: ChapterDraft) {
        self.chapters.insert(draft.number, draft);
        self.touch();
    }

    pub(crate) fn set_critique(&mut self, critique: String) {
        self.critique = Some(critique);
        self.touch();
    }

    pub(crate) fn record_usage(&mut self, usage: Option<&TokenUsage>) {
        if let Some(usage) = usage {
            self.usage.accumulate(usage);
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Write the session as pretty JSON, creating parent directories.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> WhodunitResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| IoError::new(parent.display().to_string(), e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(JsonError::from)?;
        std::fs::write(path, json)
            .map_err(|e| IoError::new(path.display().to_string(), e.to_string()))?;

        debug!(stage = %self.next_stage(), "Session saved");
        Ok(())
    }

    /// Read a session written by [`WorkflowSession::save`].
    #[instrument(fields(path = %path.as_ref().display()), skip(path))]
    pub fn load(path: impl AsRef<Path>) -> WhodunitResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| IoError::new(path.display().to_string(), e.to_string()))?;
        let session: Self = serde_json::from_str(&json).map_err(JsonError::from)?;

        debug!(stage = %session.next_stage(), "Session loaded");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_outline(chapters: usize) -> WorkflowSession {
        let brief = MysteryBrief::builder().premise("p").build().unwrap();
        let mut session = WorkflowSession::new(brief);
        session.set_idea("Title: The Last Train\nA body on the sleeper.".to_string());
        let plans = (1..=chapters)
            .map(|n| ChapterPlan::new(n, format!("C{n}"), "s"))
            .collect();
        session.set_outline(Outline::from_chapters("raw", plans));
        session
    }

    #[test]
    fn test_next_stage_progression() {
        let brief = MysteryBrief::builder().premise("p").build().unwrap();
        let fresh = WorkflowSession::new(brief);
        assert_eq!(fresh.next_stage(), Stage::Idea);

        let mut session = session_with_outline(2);
        assert_eq!(session.next_stage(), Stage::Chapters);
        assert_eq!(session.missing_chapters(), vec![1, 2]);

        let plan = session.outline().as_ref().unwrap().chapters()[0].clone();
        session.insert_chapter(ChapterDraft::new(&plan, "one two three"));
        assert_eq!(session.missing_chapters(), vec![2]);

        let plan = session.outline().as_ref().unwrap().chapters()[1].clone();
        session.insert_chapter(ChapterDraft::new(&plan, "four"));
        assert_eq!(session.next_stage(), Stage::Critique);

        session.set_critique("Tighten chapter 2.".to_string());
        assert!(session.is_complete());
    }

    #[test]
    fn test_reset_from_outline_keeps_idea() {
        let mut session = session_with_outline(1);
        session.set_critique("c".to_string());
        session.reset_from(Stage::Outline);

        assert!(session.idea().is_some());
        assert!(session.outline().is_none());
        assert!(session.critique().is_none());
        assert_eq!(session.next_stage(), Stage::Outline);
    }

    #[test]
    fn test_title_falls_back_to_idea() {
        let session = session_with_outline(1);
        assert_eq!(session.title(), "The Last Train");
    }

    #[test]
    fn test_stage_parses_from_text() {
        assert_eq!("chapters".parse::<Stage>().unwrap(), Stage::Chapters);
        assert_eq!("Outline".parse::<Stage>().unwrap(), Stage::Outline);
    }

    #[test]
    fn test_save_and_load_preserve_progress() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("hive.json");

        let mut session = session_with_outline(2);
        session.record_usage(Some(&TokenUsage::new(3, 4, 7)));
        session.save(&path).unwrap();

        let loaded = WorkflowSession::load(&path).unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.next_stage(), Stage::Chapters);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WorkflowSession::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err.kind(), whodunit_error::WhodunitErrorKind::Io(_)));
    }
}
