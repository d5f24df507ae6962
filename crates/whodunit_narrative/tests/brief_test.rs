//! Tests for loading briefs from disk.

use std::io::Write;
use whodunit_core::CharacterRole;
use whodunit_error::{WhodunitErrorKind, WorkflowErrorKind};
use whodunit_narrative::{MysteryBrief, prompts};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_from_file_reads_cast_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "brief.toml",
        r#"
premise = "A retired colonel is found dead in a locked library."
setting = "An English country house"
chapter_count = 10

[[cast]]
name = "Inspector Hale"
role = "detective"

[[cast]]
name = "Colonel Ashby"
role = "victim"
description = "Collects clocks"
"#,
    );

    let brief = MysteryBrief::from_file(&path).unwrap();

    assert_eq!(*brief.chapter_count(), 10);
    assert_eq!(*brief.words_per_chapter(), 2500);
    assert_eq!(brief.cast().len(), 2);
    assert_eq!(*brief.cast()[0].role(), CharacterRole::Detective);
    assert_eq!(brief.cast()[1].description().as_deref(), Some("Collects clocks"));
    assert!(brief.title().is_none());
}

#[test]
fn test_from_file_rejects_invalid_brief() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "brief.toml", "premise = \"x\"\nchapter_count = 0\n");

    let err = MysteryBrief::from_file(&path).unwrap_err();
    match err.kind() {
        WhodunitErrorKind::Workflow(e) => {
            assert!(matches!(e.kind, WorkflowErrorKind::InvalidBrief(_)));
        }
        other => panic!("expected workflow error, got {other}"),
    }
}

#[test]
fn test_from_file_reports_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "brief.toml", "premise = [unclosed");

    let err = MysteryBrief::from_file(&path).unwrap_err();
    match err.kind() {
        WhodunitErrorKind::Workflow(e) => {
            assert!(matches!(e.kind, WorkflowErrorKind::TomlParse(_)));
        }
        other => panic!("expected workflow error, got {other}"),
    }
}

#[test]
fn test_notes_file_reaches_prompts() {
    let dir = tempfile::tempdir().unwrap();
    let notes = write_file(&dir, "notes.txt", "\nThe library clock runs ten minutes fast.\n");

    let brief = MysteryBrief::builder()
        .premise("A death in the library")
        .notes(Some("Set in winter.".to_string()))
        .build()
        .unwrap()
        .with_notes_file(&notes)
        .unwrap();

    assert_eq!(
        brief.notes().as_deref(),
        Some("Set in winter.\n\nThe library clock runs ten minutes fast.")
    );
    assert!(prompts::idea_prompt(&brief).contains("ten minutes fast"));
}

#[test]
fn test_missing_notes_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let brief = MysteryBrief::builder().premise("p").build().unwrap();

    let err = brief.with_notes_file(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err.kind(), WhodunitErrorKind::Io(_)));
}
