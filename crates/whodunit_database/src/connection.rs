//! Database connection utilities.

use crate::DatabaseResult;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::instrument;
use whodunit_error::{DatabaseError, DatabaseErrorKind};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open a SQLite database and bring its schema up to date.
///
/// `database_url` is a file path or `:memory:`. Missing parent directories
/// of a file path are created.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The connection cannot be established
/// - A migration fails
#[instrument(name = "database.establish_connection")]
pub fn establish_connection(database_url: &str) -> DatabaseResult<SqliteConnection> {
    if database_url != ":memory:"
        && let Some(parent) = std::path::Path::new(database_url)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            tracing::error!(error = %e, "Failed to create database directory");
            DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
        })?;
    }

    tracing::debug!("Connecting to SQLite database");
    let mut conn = SqliteConnection::establish(database_url).map_err(|e| {
        tracing::error!(error = %e, "Failed to establish database connection");
        DatabaseError::new(DatabaseErrorKind::Connection(e.to_string()))
    })?;

    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
    run_migrations(&mut conn)?;
    Ok(conn)
}

/// Apply any migrations the database has not seen yet.
#[instrument(name = "database.run_migrations", skip_all)]
pub fn run_migrations(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        tracing::error!(error = %e, "Migration failed");
        DatabaseError::new(DatabaseErrorKind::Migration(e.to_string()))
    })?;

    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied migrations");
    }
    Ok(())
}
