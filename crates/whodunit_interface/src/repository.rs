//! Novel repository trait.

use async_trait::async_trait;
use whodunit_core::{Character, NewCharacter, NewNovel, Novel};
use whodunit_error::WhodunitResult;

/// CRUD storage for novels and their casts.
///
/// Lookups of ids that do not exist fail with a `NotFound` database error.
#[async_trait]
pub trait NovelRepository: Send + Sync {
    /// Store a new novel and return it with its assigned id.
    async fn create_novel(&self, novel: &NewNovel) -> WhodunitResult<Novel>;

    /// Fetch a novel by id, `None` if absent.
    async fn get_novel(&self, id: i32) -> WhodunitResult<Option<Novel>>;

    /// All novels, oldest first.
    async fn list_novels(&self) -> WhodunitResult<Vec<Novel>>;

    /// Replace a novel's title and synopsis.
    async fn update_novel(&self, id: i32, novel: &NewNovel) -> WhodunitResult<Novel>;

    /// Delete a novel together with its characters.
    async fn delete_novel(&self, id: i32) -> WhodunitResult<()>;

    /// Add a character to an existing novel.
    async fn add_character(&self, novel_id: i32, character: &NewCharacter)
    -> WhodunitResult<Character>;

    /// Characters of a novel in insertion order.
    async fn list_characters(&self, novel_id: i32) -> WhodunitResult<Vec<Character>>;

    /// Replace a character's fields.
    async fn update_character(&self, id: i32, character: &NewCharacter)
    -> WhodunitResult<Character>;

    /// Delete a single character.
    async fn delete_character(&self, id: i32) -> WhodunitResult<()>;
}
