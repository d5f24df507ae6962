//! Completion endpoint clients.
//!
//! [`OpenAICompatibleClient`] talks to any chat-completions style endpoint.
//! [`QueuedDriver`] wraps a driver so every call goes through a shared
//! [`whodunit_queue::TaskQueue`], one request at a time.

mod openai_compat;
mod queued;

pub use openai_compat::{ChatMessage, ChatRequest, ChatResponse, OpenAICompatibleClient};
pub use queued::QueuedDriver;
