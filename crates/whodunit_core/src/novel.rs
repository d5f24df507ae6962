//! Novel and character records managed by the novel repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Narrative function a character serves in a mystery.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CharacterRole {
    Detective,
    Victim,
    Culprit,
    #[default]
    Suspect,
    Witness,
    Sidekick,
}

/// A stored novel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Novel {
    /// Repository-assigned identifier
    id: i32,
    /// Working title
    title: String,
    /// Short synopsis, usually the generated premise
    synopsis: Option<String>,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Last modification time
    updated_at: DateTime<Utc>,
}

impl Novel {
    /// Assembles a novel from stored fields.
    pub fn new(
        id: i32,
        title: impl Into<String>,
        synopsis: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            synopsis,
            created_at,
            updated_at,
        }
    }
}

/// Fields for creating or replacing a novel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NewNovel {
    /// Working title
    title: String,
    /// Short synopsis
    synopsis: Option<String>,
}

impl NewNovel {
    /// Creates novel fields.
    pub fn new(title: impl Into<String>, synopsis: Option<String>) -> Self {
        Self {
            title: title.into(),
            synopsis,
        }
    }
}

/// A stored character belonging to a novel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Character {
    /// Repository-assigned identifier
    id: i32,
    /// Owning novel
    novel_id: i32,
    /// Character name
    name: String,
    /// Narrative role
    role: CharacterRole,
    /// Free-form description
    description: Option<String>,
}

impl Character {
    /// Assembles a character from stored fields.
    pub fn new(
        id: i32,
        novel_id: i32,
        name: impl Into<String>,
        role: CharacterRole,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            novel_id,
            name: name.into(),
            role,
            description,
        }
    }
}

/// Fields for creating or replacing a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct NewCharacter {
    /// Character name
    name: String,
    /// Narrative role
    role: CharacterRole,
    /// Free-form description
    description: Option<String>,
}

impl NewCharacter {
    /// Creates character fields.
    pub fn new(name: impl Into<String>, role: CharacterRole, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            role,
            description,
        }
    }
}
