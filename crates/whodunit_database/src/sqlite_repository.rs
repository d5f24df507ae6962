//! SQLite implementation of NovelRepository.

use crate::models::{CharacterRow, NewCharacterRow, NewNovelRow, NovelRow};
use crate::schema::{characters, novels};
use crate::validation::{character_not_found, novel_not_found, validate_character, validate_novel};
use crate::{DatabaseResult, establish_connection};
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};
use tracing::instrument;
use whodunit_core::{Character, NewCharacter, NewNovel, Novel};
use whodunit_error::{DatabaseError, DatabaseErrorKind, WhodunitResult};
use whodunit_interface::NovelRepository;

/// Novel repository backed by a single SQLite connection.
///
/// Diesel calls block, so each operation runs on the blocking thread pool
/// while holding the connection lock.
#[derive(Clone)]
pub struct SqliteNovelRepository {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl std::fmt::Debug for SqliteNovelRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteNovelRepository").finish_non_exhaustive()
    }
}

impl SqliteNovelRepository {
    /// Open (or create) the database at `database_url` and migrate it.
    pub fn open(database_url: &str) -> DatabaseResult<Self> {
        Ok(Self::from_connection(establish_connection(database_url)?))
    }

    /// Wrap an already migrated connection.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, op: F) -> WhodunitResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> DatabaseResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let result = tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| {
                DatabaseError::new(DatabaseErrorKind::Worker(
                    "connection lock poisoned".to_string(),
                ))
            })?;
            op(&mut *guard)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Worker(e.to_string())))?;
        Ok(result?)
    }
}

fn require_novel(conn: &mut SqliteConnection, id: i32) -> DatabaseResult<NovelRow> {
    novels::table
        .find(id)
        .select(NovelRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| novel_not_found(id))
}

#[async_trait]
impl NovelRepository for SqliteNovelRepository {
    #[instrument(skip_all, fields(title = %novel.title()))]
    async fn create_novel(&self, novel: &NewNovel) -> WhodunitResult<Novel> {
        validate_novel(novel)?;
        let row = NewNovelRow::new(novel, Utc::now().naive_utc());

        self.with_conn(move |conn| {
            let stored: NovelRow = diesel::insert_into(novels::table)
                .values(&row)
                .returning(NovelRow::as_returning())
                .get_result(conn)?;
            tracing::debug!(id = stored.id, "Novel created");
            Ok(stored.into())
        })
        .await
    }

    async fn get_novel(&self, id: i32) -> WhodunitResult<Option<Novel>> {
        self.with_conn(move |conn| {
            let row: Option<NovelRow> = novels::table
                .find(id)
                .select(NovelRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(Novel::from))
        })
        .await
    }

    async fn list_novels(&self) -> WhodunitResult<Vec<Novel>> {
        self.with_conn(|conn| {
            let rows: Vec<NovelRow> = novels::table
                .order(novels::id.asc())
                .select(NovelRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(Novel::from).collect())
        })
        .await
    }

    #[instrument(skip(self, novel))]
    async fn update_novel(&self, id: i32, novel: &NewNovel) -> WhodunitResult<Novel> {
        validate_novel(novel)?;
        let title = novel.title().trim().to_string();
        let synopsis = novel.synopsis().clone();

        self.with_conn(move |conn| {
            diesel::update(novels::table.find(id))
                .set((
                    novels::title.eq(title),
                    novels::synopsis.eq(synopsis),
                    novels::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(NovelRow::as_returning())
                .get_result::<NovelRow>(conn)
                .optional()?
                .map(Novel::from)
                .ok_or_else(|| novel_not_found(id))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_novel(&self, id: i32) -> WhodunitResult<()> {
        self.with_conn(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                diesel::delete(characters::table.filter(characters::novel_id.eq(id)))
                    .execute(conn)?;
                let deleted = diesel::delete(novels::table.find(id)).execute(conn)?;
                if deleted == 0 {
                    return Err(novel_not_found(id));
                }
                Ok(())
            })
        })
        .await
    }

    #[instrument(skip(self, character), fields(name = %character.name()))]
    async fn add_character(
        &self,
        novel_id: i32,
        character: &NewCharacter,
    ) -> WhodunitResult<Character> {
        validate_character(character)?;
        let row = NewCharacterRow::new(novel_id, character);

        self.with_conn(move |conn| {
            conn.transaction::<_, DatabaseError, _>(|conn| {
                require_novel(conn, novel_id)?;
                let stored: CharacterRow = diesel::insert_into(characters::table)
                    .values(&row)
                    .returning(CharacterRow::as_returning())
                    .get_result(conn)?;
                Character::try_from(stored)
            })
        })
        .await
    }

    async fn list_characters(&self, novel_id: i32) -> WhodunitResult<Vec<Character>> {
        self.with_conn(move |conn| {
            let novel = require_novel(conn, novel_id)?;
            CharacterRow::belonging_to(&novel)
                .order(characters::id.asc())
                .select(CharacterRow::as_select())
                .load::<CharacterRow>(conn)?
                .into_iter()
                .map(Character::try_from)
                .collect()
        })
        .await
    }

    #[instrument(skip(self, character))]
    async fn update_character(
        &self,
        id: i32,
        character: &NewCharacter,
    ) -> WhodunitResult<Character> {
        validate_character(character)?;
        let name = character.name().trim().to_string();
        let role = character.role().to_string();
        let description = character.description().clone();

        self.with_conn(move |conn| {
            let stored: CharacterRow = diesel::update(characters::table.find(id))
                .set((
                    characters::name.eq(name),
                    characters::role.eq(role),
                    characters::description.eq(description),
                ))
                .returning(CharacterRow::as_returning())
                .get_result(conn)
                .optional()?
                .ok_or_else(|| character_not_found(id))?;
            Character::try_from(stored)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_character(&self, id: i32) -> WhodunitResult<()> {
        self.with_conn(move |conn| {
            let deleted = diesel::delete(characters::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(character_not_found(id));
            }
            Ok(())
        })
        .await
    }
}
