//! Checks applied before any write.

use whodunit_core::{NewCharacter, NewNovel};
use whodunit_error::{DatabaseError, DatabaseErrorKind};

pub(crate) fn validate_novel(novel: &NewNovel) -> Result<(), DatabaseError> {
    if novel.title().trim().is_empty() {
        return Err(DatabaseError::new(DatabaseErrorKind::Validation(
            "novel title must not be empty".to_string(),
        )));
    }
    Ok(())
}

pub(crate) fn validate_character(character: &NewCharacter) -> Result<(), DatabaseError> {
    if character.name().trim().is_empty() {
        return Err(DatabaseError::new(DatabaseErrorKind::Validation(
            "character name must not be empty".to_string(),
        )));
    }
    Ok(())
}

#[track_caller]
pub(crate) fn novel_not_found(id: i32) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::NotFound(format!("novel {}", id)))
}

#[track_caller]
pub(crate) fn character_not_found(id: i32) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::NotFound(format!("character {}", id)))
}
