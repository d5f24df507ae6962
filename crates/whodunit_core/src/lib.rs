//! Core data types for the whodunit toolkit.
//!
//! This crate provides the plain data shared by the completion client, the
//! writing workflow and the novel repository.

mod message;
mod novel;
mod request;
mod role;
mod token_usage;

pub use message::Message;
pub use novel::{Character, CharacterRole, NewCharacter, NewNovel, Novel};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use token_usage::TokenUsage;
