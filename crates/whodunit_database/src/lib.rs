//! SQLite storage for whodunit novels and their casts.
//!
//! [`SqliteNovelRepository`] persists records with Diesel and embedded
//! migrations. [`InMemoryNovelRepository`] implements the same trait without
//! any storage and is meant for tests.

mod connection;
mod in_memory_repository;
mod models;
mod schema;
mod sqlite_repository;
mod validation;

pub use connection::{MIGRATIONS, establish_connection, run_migrations};
pub use in_memory_repository::InMemoryNovelRepository;
pub use models::{CharacterRow, NewCharacterRow, NewNovelRow, NovelRow};
pub use sqlite_repository::SqliteNovelRepository;

use whodunit_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
