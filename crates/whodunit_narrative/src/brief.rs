//! The author's brief: everything the workflow is told before it starts.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};
use whodunit_core::{CharacterRole, NewCharacter};
use whodunit_error::{IoError, WhodunitResult, WorkflowError, WorkflowErrorKind};

/// Largest outline the workflow will ask for.
pub const MAX_CHAPTERS: usize = 60;

fn default_chapter_count() -> usize {
    12
}

fn default_words_per_chapter() -> usize {
    2500
}

/// A character the author wants in the story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CastMember {
    /// Character name
    name: String,
    /// Narrative role
    #[serde(default)]
    role: CharacterRole,
    /// Optional sketch
    #[serde(default)]
    description: Option<String>,
}

impl CastMember {
    /// Creates a cast member.
    pub fn new(name: impl Into<String>, role: CharacterRole, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            role,
            description,
        }
    }

    /// Repository form of this cast member.
    pub fn to_new_character(&self) -> NewCharacter {
        NewCharacter::new(self.name.clone(), self.role, self.description.clone())
    }
}

/// What the author asks for.
///
/// Loaded from TOML:
///
/// ```toml
/// title = "Death at Ashcombe Hall"
/// premise = "A retired colonel is found dead in a locked library."
/// setting = "An English country house"
/// era = "1920s"
/// chapter_count = 10
///
/// [[cast]]
/// name = "Inspector Hale"
/// role = "detective"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct MysteryBrief {
    /// Working title; generated when absent
    #[serde(default)]
    #[builder(default)]
    title: Option<String>,
    /// Core premise
    premise: String,
    /// Where the story happens
    #[serde(default)]
    #[builder(default)]
    setting: Option<String>,
    /// When the story happens
    #[serde(default)]
    #[builder(default)]
    era: Option<String>,
    /// Voice and mood
    #[serde(default)]
    #[builder(default)]
    tone: Option<String>,
    /// Number of chapters to outline
    #[serde(default = "default_chapter_count")]
    #[builder(default = "default_chapter_count()")]
    chapter_count: usize,
    /// Target length of each chapter
    #[serde(default = "default_words_per_chapter")]
    #[builder(default = "default_words_per_chapter()")]
    words_per_chapter: usize,
    /// Characters the author has already decided on
    #[serde(default)]
    #[builder(default)]
    cast: Vec<CastMember>,
    /// Free-form reference material
    #[serde(default)]
    #[builder(default)]
    notes: Option<String>,
}

impl MysteryBrief {
    /// Returns a builder for MysteryBrief.
    pub fn builder() -> MysteryBriefBuilder {
        MysteryBriefBuilder::default()
    }

    /// Load and validate a brief from a TOML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> WhodunitResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| IoError::new(path.display().to_string(), e.to_string()))?;

        let brief: Self = toml::from_str(&content)
            .map_err(|e| WorkflowError::new(WorkflowErrorKind::TomlParse(e.to_string())))?;
        brief.validate()?;

        debug!(
            chapters = brief.chapter_count,
            cast = brief.cast.len(),
            "Loaded brief"
        );
        Ok(brief)
    }

    /// Attach the contents of a text file as reference notes.
    ///
    /// Existing notes are kept and the file contents appended.
    pub fn with_notes_file(mut self, path: impl AsRef<Path>) -> WhodunitResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| IoError::new(path.display().to_string(), e.to_string()))?;

        self.notes = match self.notes.take() {
            Some(existing) if !existing.trim().is_empty() => {
                Some(format!("{}\n\n{}", existing.trim_end(), text.trim()))
            }
            _ => Some(text.trim().to_string()),
        };
        Ok(self)
    }

    /// Reject briefs the workflow cannot act on.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let invalid = |msg: String| -> Result<(), WorkflowError> {
            Err(WorkflowError::new(WorkflowErrorKind::InvalidBrief(msg)))
        };

        if self.premise.trim().is_empty() {
            return invalid("premise must not be empty".to_string());
        }
        if self.chapter_count == 0 || self.chapter_count > MAX_CHAPTERS {
            return invalid(format!(
                "chapter_count must be between 1 and {}, got {}",
                MAX_CHAPTERS, self.chapter_count
            ));
        }
        if self.words_per_chapter == 0 {
            return invalid("words_per_chapter must be positive".to_string());
        }
        if let Some(position) = self.cast.iter().position(|c| c.name.trim().is_empty()) {
            return invalid(format!("cast member {} has no name", position + 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> MysteryBrief {
        MysteryBrief::builder()
            .premise("A body in the greenhouse")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_applies_defaults() {
        let brief = brief();
        assert_eq!(*brief.chapter_count(), 12);
        assert_eq!(*brief.words_per_chapter(), 2500);
        assert!(brief.validate().is_ok());
    }

    #[test]
    fn test_blank_premise_rejected() {
        let brief = MysteryBrief::builder().premise("  ").build().unwrap();
        let err = brief.validate().unwrap_err();
        assert!(matches!(err.kind, WorkflowErrorKind::InvalidBrief(_)));
    }

    #[test]
    fn test_chapter_count_bounds() {
        for count in [0, MAX_CHAPTERS + 1] {
            let brief = MysteryBrief::builder()
                .premise("p")
                .chapter_count(count)
                .build()
                .unwrap();
            assert!(brief.validate().is_err(), "count {count} accepted");
        }
    }

    #[test]
    fn test_nameless_cast_member_rejected() {
        let brief = MysteryBrief::builder()
            .premise("p")
            .cast(vec![CastMember::new(" ", CharacterRole::Victim, None)])
            .build()
            .unwrap();
        assert!(brief.validate().is_err());
    }
}
