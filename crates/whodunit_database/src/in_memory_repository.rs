//! In-memory implementation of NovelRepository for testing.
//!
//! Records live in maps behind a single RwLock and are lost when the
//! repository is dropped. Ids are assigned from 1 as SQLite would.

use crate::validation::{character_not_found, novel_not_found, validate_character, validate_novel};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use whodunit_core::{Character, NewCharacter, NewNovel, Novel};
use whodunit_error::WhodunitResult;
use whodunit_interface::NovelRepository;

/// In-memory repository for novels and characters.
///
/// # Example
/// ```no_run
/// use whodunit_database::InMemoryNovelRepository;
/// use whodunit_interface::NovelRepository;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = InMemoryNovelRepository::new();
///     let novels = repo.list_novels().await.unwrap();
///     assert!(novels.is_empty());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryNovelRepository {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    novels: BTreeMap<i32, Novel>,
    characters: BTreeMap<i32, Character>,
    last_novel_id: i32,
    last_character_id: i32,
}

impl InMemoryNovelRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored novels.
    pub async fn len(&self) -> usize {
        self.state.read().await.novels.len()
    }

    /// Check if the repository holds no novels.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.novels.is_empty()
    }
}

#[async_trait]
impl NovelRepository for InMemoryNovelRepository {
    async fn create_novel(&self, novel: &NewNovel) -> WhodunitResult<Novel> {
        validate_novel(novel)?;
        let mut state = self.state.write().await;
        state.last_novel_id += 1;

        let now = Utc::now();
        let stored = Novel::new(
            state.last_novel_id,
            novel.title().trim(),
            novel.synopsis().clone(),
            now,
            now,
        );
        state.novels.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn get_novel(&self, id: i32) -> WhodunitResult<Option<Novel>> {
        Ok(self.state.read().await.novels.get(&id).cloned())
    }

    async fn list_novels(&self) -> WhodunitResult<Vec<Novel>> {
        Ok(self.state.read().await.novels.values().cloned().collect())
    }

    async fn update_novel(&self, id: i32, novel: &NewNovel) -> WhodunitResult<Novel> {
        validate_novel(novel)?;
        let mut state = self.state.write().await;
        let existing = state.novels.get_mut(&id).ok_or_else(|| novel_not_found(id))?;

        *existing = Novel::new(
            id,
            novel.title().trim(),
            novel.synopsis().clone(),
            *existing.created_at(),
            Utc::now(),
        );
        Ok(existing.clone())
    }

    async fn delete_novel(&self, id: i32) -> WhodunitResult<()> {
        let mut state = self.state.write().await;
        state.novels.remove(&id).ok_or_else(|| novel_not_found(id))?;
        state.characters.retain(|_, c| *c.novel_id() != id);
        Ok(())
    }

    async fn add_character(
        &self,
        novel_id: i32,
        character: &NewCharacter,
    ) -> WhodunitResult<Character> {
        validate_character(character)?;
        let mut state = self.state.write().await;
        if !state.novels.contains_key(&novel_id) {
            return Err(novel_not_found(novel_id).into());
        }
        state.last_character_id += 1;

        let stored = Character::new(
            state.last_character_id,
            novel_id,
            character.name().trim(),
            *character.role(),
            character.description().clone(),
        );
        state.characters.insert(*stored.id(), stored.clone());
        Ok(stored)
    }

    async fn list_characters(&self, novel_id: i32) -> WhodunitResult<Vec<Character>> {
        let state = self.state.read().await;
        if !state.novels.contains_key(&novel_id) {
            return Err(novel_not_found(novel_id).into());
        }
        Ok(state
            .characters
            .values()
            .filter(|c| *c.novel_id() == novel_id)
            .cloned()
            .collect())
    }

    async fn update_character(
        &self,
        id: i32,
        character: &NewCharacter,
    ) -> WhodunitResult<Character> {
        validate_character(character)?;
        let mut state = self.state.write().await;
        let existing = state
            .characters
            .get_mut(&id)
            .ok_or_else(|| character_not_found(id))?;

        *existing = Character::new(
            id,
            *existing.novel_id(),
            character.name().trim(),
            *character.role(),
            character.description().clone(),
        );
        Ok(existing.clone())
    }

    async fn delete_character(&self, id: i32) -> WhodunitResult<()> {
        let mut state = self.state.write().await;
        state
            .characters
            .remove(&id)
            .ok_or_else(|| character_not_found(id))?;
        Ok(())
    }
}
