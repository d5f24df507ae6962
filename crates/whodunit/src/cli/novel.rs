//! Novel and character command handlers.

use super::{CharacterCommand, NovelCommand};
use anyhow::Context;
use whodunit::{Character, NewCharacter, NewNovel, Novel, NovelRepository};

/// Handles novel subcommands.
#[tracing::instrument(skip(repo))]
pub async fn handle_novel_command(
    repo: &dyn NovelRepository,
    command: NovelCommand,
) -> anyhow::Result<()> {
    match command {
        NovelCommand::Add { title, synopsis } => {
            let novel = repo.create_novel(&NewNovel::new(title, synopsis)).await?;
            println!("Added novel {}", novel.id());
        }
        NovelCommand::List => {
            let novels = repo.list_novels().await?;
            if novels.is_empty() {
                println!("No novels stored.");
            }
            for novel in &novels {
                print_novel(novel);
            }
        }
        NovelCommand::Show { id } => {
            let novel = repo
                .get_novel(id)
                .await?
                .with_context(|| format!("No novel with id {}", id))?;
            print_novel(&novel);
            if let Some(synopsis) = novel.synopsis() {
                println!("\n{}\n", synopsis);
            }
            for character in repo.list_characters(id).await? {
                print_character(&character);
            }
        }
        NovelCommand::Update {
            id,
            title,
            synopsis,
        } => {
            let novel = repo
                .update_novel(id, &NewNovel::new(title, synopsis))
                .await?;
            print_novel(&novel);
        }
        NovelCommand::Delete { id } => {
            repo.delete_novel(id).await?;
            println!("Deleted novel {}", id);
        }
    }
    Ok(())
}

/// Handles character subcommands.
#[tracing::instrument(skip(repo))]
pub async fn handle_character_command(
    repo: &dyn NovelRepository,
    command: CharacterCommand,
) -> anyhow::Result<()> {
    match command {
        CharacterCommand::Add {
            novel,
            name,
            role,
            description,
        } => {
            let character = repo
                .add_character(novel, &NewCharacter::new(name, role, description))
                .await?;
            println!("Added character {}", character.id());
        }
        CharacterCommand::List { novel } => {
            let cast = repo.list_characters(novel).await?;
            if cast.is_empty() {
                println!("No characters for novel {}.", novel);
            }
            for character in &cast {
                print_character(character);
            }
        }
        CharacterCommand::Update {
            id,
            name,
            role,
            description,
        } => {
            let character = repo
                .update_character(id, &NewCharacter::new(name, role, description))
                .await?;
            print_character(&character);
        }
        CharacterCommand::Delete { id } => {
            repo.delete_character(id).await?;
            println!("Deleted character {}", id);
        }
    }
    Ok(())
}

fn print_novel(novel: &Novel) {
    println!(
        "{:>4}  {}  (updated {})",
        novel.id(),
        novel.title(),
        novel.updated_at().format("%Y-%m-%d")
    );
}

fn print_character(character: &Character) {
    match character.description() {
        Some(description) => println!(
            "{:>4}  {} [{}]: {}",
            character.id(),
            character.name(),
            character.role(),
            description
        ),
        None => println!(
            "{:>4}  {} [{}]",
            character.id(),
            character.name(),
            character.role()
        ),
    }
}
