//! Diesel models for the novels and characters tables.

use crate::schema::{characters, novels};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;
use whodunit_core::{Character, CharacterRole, NewCharacter, NewNovel, Novel};
use whodunit_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the novels table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = novels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NovelRow {
    /// Novel ID
    pub id: i32,
    /// Title
    pub title: String,
    /// Optional synopsis
    pub synopsis: Option<String>,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
    /// Last update timestamp (UTC)
    pub updated_at: NaiveDateTime,
}

impl From<NovelRow> for Novel {
    fn from(row: NovelRow) -> Self {
        Novel::new(
            row.id,
            row.title,
            row.synopsis,
            row.created_at.and_utc(),
            row.updated_at.and_utc(),
        )
    }
}

/// Insertable form of a novel.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = novels)]
pub struct NewNovelRow {
    /// Title
    pub title: String,
    /// Optional synopsis
    pub synopsis: Option<String>,
    /// Creation timestamp (UTC)
    pub created_at: NaiveDateTime,
    /// Last update timestamp (UTC)
    pub updated_at: NaiveDateTime,
}

impl NewNovelRow {
    /// Row for `novel` stamped with `now`.
    pub fn new(novel: &NewNovel, now: NaiveDateTime) -> Self {
        Self {
            title: novel.title().trim().to_string(),
            synopsis: novel.synopsis().clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Database row for the characters table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Associations)]
#[diesel(table_name = characters)]
#[diesel(belongs_to(NovelRow, foreign_key = novel_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CharacterRow {
    /// Character ID
    pub id: i32,
    /// Owning novel
    pub novel_id: i32,
    /// Character name
    pub name: String,
    /// Role stored as snake_case text
    pub role: String,
    /// Optional sketch
    pub description: Option<String>,
}

impl TryFrom<CharacterRow> for Character {
    type Error = DatabaseError;

    fn try_from(row: CharacterRow) -> Result<Self, Self::Error> {
        let role = CharacterRole::from_str(&row.role).map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Query(format!(
                "character {} has unknown role '{}'",
                row.id, row.role
            )))
        })?;
        Ok(Character::new(
            row.id,
            row.novel_id,
            row.name,
            role,
            row.description,
        ))
    }
}

/// Insertable form of a character.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = characters)]
pub struct NewCharacterRow {
    /// Owning novel
    pub novel_id: i32,
    /// Character name
    pub name: String,
    /// Role as snake_case text
    pub role: String,
    /// Optional sketch
    pub description: Option<String>,
}

impl NewCharacterRow {
    /// Row for `character` belonging to `novel_id`.
    pub fn new(novel_id: i32, character: &NewCharacter) -> Self {
        Self {
            novel_id,
            name: character.name().trim().to_string(),
            role: character.role().to_string(),
            description: character.description().clone(),
        }
    }
}
