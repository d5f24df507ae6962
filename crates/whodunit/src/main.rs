//! The whodunit command-line tool.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::{debug, info};
use whodunit::{SqliteNovelRepository, WhodunitConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded_env = dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);
    if let Some(path) = loaded_env {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let config = WhodunitConfig::load(cli.config.as_deref())?;
    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| config.storage().database_url().clone());
    info!(
        model = %config.api().model(),
        mode = ?config.queue().mode(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Write(args) => cli::handle_write_command(&config, &database_url, args).await,
        Commands::Compile { session, out, plain } => {
            cli::handle_compile_command(&session, &out, plain)
        }
        Commands::Status { session } => cli::handle_status_command(&session),
        Commands::Novel(command) => {
            let repo = SqliteNovelRepository::open(&database_url)?;
            cli::handle_novel_command(&repo, command).await
        }
        Commands::Character(command) => {
            let repo = SqliteNovelRepository::open(&database_url)?;
            cli::handle_character_command(&repo, command).await
        }
    }
}
