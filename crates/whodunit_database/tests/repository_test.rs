//! Behavior shared by every NovelRepository implementation.

use whodunit_core::{CharacterRole, NewCharacter, NewNovel};
use whodunit_database::{InMemoryNovelRepository, SqliteNovelRepository};
use whodunit_error::{DatabaseErrorKind, WhodunitError, WhodunitErrorKind};
use whodunit_interface::NovelRepository;

fn sqlite() -> SqliteNovelRepository {
    SqliteNovelRepository::open(":memory:").unwrap()
}

fn database_kind(err: &WhodunitError) -> &DatabaseErrorKind {
    match err.kind() {
        WhodunitErrorKind::Database(e) => &e.kind,
        other => panic!("expected database error, got {other}"),
    }
}

fn novel(title: &str) -> NewNovel {
    NewNovel::new(title, Some("A country-house puzzle".to_string()))
}

fn character(name: &str, role: CharacterRole) -> NewCharacter {
    NewCharacter::new(name, role, None)
}

async fn novel_crud(repo: &dyn NovelRepository) {
    let first = repo.create_novel(&novel("  The Ashcombe Affair ")).await.unwrap();
    let second = repo.create_novel(&novel("Murder on the Ferry")).await.unwrap();
    assert_eq!(first.title(), "The Ashcombe Affair");
    assert!(second.id() > first.id());

    let fetched = repo.get_novel(*first.id()).await.unwrap().unwrap();
    assert_eq!(fetched.title(), first.title());
    assert_eq!(fetched.synopsis().as_deref(), Some("A country-house puzzle"));

    let titles: Vec<_> = repo
        .list_novels()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.title().clone())
        .collect();
    assert_eq!(titles, ["The Ashcombe Affair", "Murder on the Ferry"]);

    let updated = repo
        .update_novel(*first.id(), &NewNovel::new("The Ashcombe Murders", None))
        .await
        .unwrap();
    assert_eq!(updated.title(), "The Ashcombe Murders");
    assert!(updated.synopsis().is_none());
    assert!(updated.updated_at() >= updated.created_at());

    repo.delete_novel(*second.id()).await.unwrap();
    assert!(repo.get_novel(*second.id()).await.unwrap().is_none());
    assert_eq!(repo.list_novels().await.unwrap().len(), 1);
}

async fn missing_records(repo: &dyn NovelRepository) {
    assert!(repo.get_novel(99).await.unwrap().is_none());

    let err = repo.update_novel(99, &novel("x")).await.unwrap_err();
    assert_eq!(
        *database_kind(&err),
        DatabaseErrorKind::NotFound("novel 99".to_string())
    );

    let err = repo.delete_novel(99).await.unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::NotFound(_)));

    let err = repo
        .add_character(99, &character("Hale", CharacterRole::Detective))
        .await
        .unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::NotFound(_)));

    let err = repo.delete_character(42).await.unwrap_err();
    assert_eq!(
        *database_kind(&err),
        DatabaseErrorKind::NotFound("character 42".to_string())
    );
}

async fn validation(repo: &dyn NovelRepository) {
    let err = repo.create_novel(&novel("   ")).await.unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::Validation(_)));

    let created = repo.create_novel(&novel("Valid")).await.unwrap();
    let err = repo
        .add_character(*created.id(), &character("", CharacterRole::Witness))
        .await
        .unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::Validation(_)));
    assert!(repo.list_characters(*created.id()).await.unwrap().is_empty());
}

async fn character_crud(repo: &dyn NovelRepository) {
    let book = repo.create_novel(&novel("Death at the Lighthouse")).await.unwrap();
    let other = repo.create_novel(&novel("Other Book")).await.unwrap();

    let keeper = repo
        .add_character(*book.id(), &character("Keeper Moss", CharacterRole::Victim))
        .await
        .unwrap();
    let inspector = repo
        .add_character(
            *book.id(),
            &NewCharacter::new(
                "Inspector Rook",
                CharacterRole::Detective,
                Some("Hates boats".to_string()),
            ),
        )
        .await
        .unwrap();
    repo.add_character(*other.id(), &character("Stranger", CharacterRole::Suspect))
        .await
        .unwrap();

    let cast = repo.list_characters(*book.id()).await.unwrap();
    assert_eq!(cast, vec![keeper.clone(), inspector.clone()]);
    assert_eq!(*cast[1].role(), CharacterRole::Detective);

    let updated = repo
        .update_character(
            *keeper.id(),
            &character("Keeper Moss", CharacterRole::Culprit),
        )
        .await
        .unwrap();
    assert_eq!(*updated.role(), CharacterRole::Culprit);
    assert_eq!(updated.novel_id(), book.id());

    repo.delete_character(*inspector.id()).await.unwrap();
    assert_eq!(repo.list_characters(*book.id()).await.unwrap(), vec![updated]);

    repo.delete_novel(*book.id()).await.unwrap();
    let err = repo.list_characters(*book.id()).await.unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::NotFound(_)));
    let err = repo.delete_character(*keeper.id()).await.unwrap_err();
    assert!(matches!(database_kind(&err), DatabaseErrorKind::NotFound(_)));
    assert_eq!(repo.list_characters(*other.id()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_in_memory_novel_crud() {
    novel_crud(&InMemoryNovelRepository::new()).await;
}

#[tokio::test]
async fn test_sqlite_novel_crud() {
    novel_crud(&sqlite()).await;
}

#[tokio::test]
async fn test_in_memory_missing_records() {
    missing_records(&InMemoryNovelRepository::new()).await;
}

#[tokio::test]
async fn test_sqlite_missing_records() {
    missing_records(&sqlite()).await;
}

#[tokio::test]
async fn test_in_memory_validation() {
    validation(&InMemoryNovelRepository::new()).await;
}

#[tokio::test]
async fn test_sqlite_validation() {
    validation(&sqlite()).await;
}

#[tokio::test]
async fn test_in_memory_character_crud() {
    character_crud(&InMemoryNovelRepository::new()).await;
}

#[tokio::test]
async fn test_sqlite_character_crud() {
    character_crud(&sqlite()).await;
}

#[tokio::test]
async fn test_sqlite_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("whodunit.db");
    let url = path.to_str().unwrap();

    let created = {
        let repo = SqliteNovelRepository::open(url).unwrap();
        let created = repo.create_novel(&novel("Persistent")).await.unwrap();
        repo.add_character(*created.id(), &character("Ada", CharacterRole::Sidekick))
            .await
            .unwrap();
        created
    };

    let reopened = SqliteNovelRepository::open(url).unwrap();
    let fetched = reopened.get_novel(*created.id()).await.unwrap().unwrap();
    assert_eq!(fetched.title(), "Persistent");
    assert_eq!(reopened.list_characters(*created.id()).await.unwrap().len(), 1);
}
