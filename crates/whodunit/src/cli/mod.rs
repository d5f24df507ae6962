//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the whodunit binary.

mod commands;
mod novel;
mod session;
mod write;

pub use commands::{CharacterCommand, Cli, Commands, NovelCommand, WriteArgs};
pub use novel::{handle_character_command, handle_novel_command};
pub use session::{handle_compile_command, handle_status_command};
pub use write::handle_write_command;
