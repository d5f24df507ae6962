//! Wire types for the chat-completions endpoint.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use whodunit_core::{Message, Role};

/// One message of a chat conversation as sent and received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the message
    pub role: Role,
    /// Text; the endpoint may return `null`
    #[serde(default)]
    pub content: Option<String>,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: *message.role(),
            content: Some(message.content().clone()),
        }
    }
}

/// Body posted to the endpoint.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation so far
    messages: Vec<ChatMessage>,
    /// Completion length cap
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Returns a builder for ChatRequest.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// A candidate completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// Position among the returned choices
    #[serde(default)]
    pub index: u32,
    /// Generated message
    pub message: ChatMessage,
    /// Why generation stopped, e.g. `stop` or `length`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the endpoint.
///
/// Servers that omit a counter leave it at zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct ChatUsage {
    /// Prompt tokens
    pub prompt_tokens: u64,
    /// Completion tokens
    pub completion_tokens: u64,
    /// Sum of both; some servers leave it out
    pub total_tokens: u64,
}

/// Response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Server-assigned completion id
    #[serde(default)]
    pub id: Option<String>,
    /// Model that actually answered
    #[serde(default)]
    pub model: Option<String>,
    /// Candidate completions
    pub choices: Vec<ChatChoice>,
    /// Token accounting
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}
