//! Ghost-write murder mysteries with a large language model.
//!
//! This crate ties the workspace together: configuration, logging, and the
//! `whodunit` command-line tool. Completion calls go through a
//! [`TaskQueue`] so the endpoint only ever sees one request at a time.
//!
//! # Crates
//!
//! - [`whodunit_queue`]: sequential FIFO task queue
//! - [`whodunit_models`]: chat-completions client and queued driver
//! - [`whodunit_narrative`]: brief, outline, workflow and manuscript
//! - [`whodunit_database`]: novel and character storage

mod config;
mod logging;

pub use config::{
    API_KEY_OVERRIDE, ApiConfig, ApiConfigBuilder, DEFAULT_CONFIG_FILE, QueueMode, QueueSettings,
    StorageConfig, WhodunitConfig,
};
pub use logging::init_tracing;

pub use whodunit_core::{
    Character, CharacterRole, GenerateRequest, GenerateResponse, Message, NewCharacter, NewNovel,
    Novel, Role, TokenUsage,
};
pub use whodunit_database::{InMemoryNovelRepository, SqliteNovelRepository};
pub use whodunit_error::{WhodunitError, WhodunitErrorKind, WhodunitResult};
pub use whodunit_interface::{CompletionDriver, NovelRepository};
pub use whodunit_models::{OpenAICompatibleClient, QueuedDriver};
pub use whodunit_narrative::{
    CastMember, GenerationSettings, Manuscript, ManuscriptFormat, MysteryBrief, MysteryWorkflow,
    Outline, Stage, WorkflowSession,
};
pub use whodunit_queue::{DrainMode, QueueConfig, TaskQueue};
