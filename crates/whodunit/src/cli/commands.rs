//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use whodunit::{CharacterRole, Stage};

/// Ghost-write murder mysteries with a large language model.
#[derive(Parser, Debug)]
#[command(name = "whodunit")]
#[command(about = "Ghost-write murder mysteries with a large language model")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to whodunit.toml when present)
    #[arg(short, long, global = true, env = "WHODUNIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Novel database, overriding storage.database_url
    #[arg(long, global = true, env = "WHODUNIT_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write (or resume writing) a mystery from a brief
    Write(WriteArgs),

    /// Compile a finished session into a manuscript
    Compile {
        /// Session file
        #[arg(long, default_value = "whodunit-session.json")]
        session: PathBuf,

        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// Write plain text instead of Markdown
        #[arg(long)]
        plain: bool,
    },

    /// Show how far a session has progressed
    Status {
        /// Session file
        #[arg(long, default_value = "whodunit-session.json")]
        session: PathBuf,
    },

    /// Manage stored novels
    #[command(subcommand)]
    Novel(NovelCommand),

    /// Manage the cast of stored novels
    #[command(subcommand)]
    Character(CharacterCommand),
}

/// Arguments for `whodunit write`.
#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Brief TOML; required unless the session file already exists
    #[arg(long)]
    pub brief: Option<PathBuf>,

    /// Text file of reference notes to attach to the brief
    #[arg(long)]
    pub notes: Option<PathBuf>,

    /// Session file, saved after every stage and resumed when present
    #[arg(long, default_value = "whodunit-session.json")]
    pub session: PathBuf,

    /// Manuscript output (defaults to a file named after the title)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Redo this stage and everything after it
    #[arg(long)]
    pub restart_from: Option<Stage>,

    /// Store the novel and its cast in the database when finished
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand, Debug)]
pub enum NovelCommand {
    /// Add a novel
    Add {
        /// Title
        #[arg(long)]
        title: String,
        /// Short synopsis
        #[arg(long)]
        synopsis: Option<String>,
    },
    /// List novels
    List,
    /// Show a novel and its cast
    Show {
        /// Novel id
        id: i32,
    },
    /// Replace a novel's title and synopsis
    Update {
        /// Novel id
        id: i32,
        /// New title
        #[arg(long)]
        title: String,
        /// New synopsis
        #[arg(long)]
        synopsis: Option<String>,
    },
    /// Delete a novel and its cast
    Delete {
        /// Novel id
        id: i32,
    },
}

#[derive(Subcommand, Debug)]
pub enum CharacterCommand {
    /// Add a character to a novel
    Add {
        /// Novel id
        #[arg(long)]
        novel: i32,
        /// Character name
        #[arg(long)]
        name: String,
        /// detective, victim, culprit, suspect, witness or sidekick
        #[arg(long, default_value = "suspect")]
        role: CharacterRole,
        /// Short sketch
        #[arg(long)]
        description: Option<String>,
    },
    /// List a novel's cast
    List {
        /// Novel id
        #[arg(long)]
        novel: i32,
    },
    /// Replace a character's fields
    Update {
        /// Character id
        id: i32,
        /// Character name
        #[arg(long)]
        name: String,
        /// Narrative role
        #[arg(long, default_value = "suspect")]
        role: CharacterRole,
        /// Short sketch
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a character
    Delete {
        /// Character id
        id: i32,
    },
}
