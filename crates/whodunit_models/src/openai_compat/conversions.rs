//! Conversions between whodunit and OpenAI chat formats.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse};
use whodunit_core::{GenerateRequest, GenerateResponse, TokenUsage};
use whodunit_error::{ModelsError, ModelsErrorKind};

/// Converts a [`GenerateRequest`] into the OpenAI chat body.
///
/// A model named on the request wins over the client default.
pub fn to_chat_request(req: &GenerateRequest, model: &str) -> Result<ChatRequest, ModelsError> {
    if req.messages().is_empty() {
        return Err(ModelsError::new(ModelsErrorKind::InvalidRequest(
            "Request has no messages".to_string(),
        )));
    }

    let messages = req
        .messages()
        .iter()
        .map(ChatMessage::from)
        .collect::<Vec<_>>();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model().clone().unwrap_or_else(|| model.to_string()))
        .messages(messages)
        .max_tokens(*req.max_tokens())
        .temperature(*req.temperature());

    builder.build().map_err(|e| {
        ModelsError::new(ModelsErrorKind::InvalidRequest(format!(
            "Failed to build request: {}",
            e
        )))
    })
}

/// Converts an OpenAI chat response into a [`GenerateResponse`].
pub fn from_chat_response(
    response: &ChatResponse,
    provider: &str,
) -> Result<GenerateResponse, ModelsError> {
    let choice = response.choices.first().ok_or_else(|| {
        ModelsError::new(ModelsErrorKind::ResponseParsing(
            "No choices in response".to_string(),
        ))
    })?;

    let content = match choice.message.content.as_deref() {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => {
            return Err(ModelsError::new(ModelsErrorKind::EmptyResponse(
                provider.to_string(),
            )));
        }
    };

    let usage = response.usage.map(|u| {
        let total = if u.total_tokens == 0 {
            u.prompt_tokens + u.completion_tokens
        } else {
            u.total_tokens
        };
        TokenUsage::new(u.prompt_tokens, u.completion_tokens, total)
    });

    Ok(GenerateResponse::new(content, usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai_compat::dto::{ChatChoice, ChatUsage};
    use whodunit_core::{Message, Role};

    fn response(content: &str, usage: Option<ChatUsage>) -> ChatResponse {
        ChatResponse {
            id: Some("cmpl-1".to_string()),
            model: None,
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage {
                    role: Role::Assistant,
                    content: Some(content.to_string()),
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage,
        }
    }

    #[test]
    fn test_prompt_becomes_system_and_user_messages() {
        let req = GenerateRequest::prompt("You are a novelist.", "Write a clue.");
        let chat = to_chat_request(&req, "gpt-test").unwrap();

        assert_eq!(chat.model(), "gpt-test");
        assert_eq!(chat.messages()[0].role, Role::System);
        assert_eq!(chat.messages()[1].role, Role::User);
        assert_eq!(chat.messages()[1].content.as_deref(), Some("Write a clue."));
    }

    #[test]
    fn test_request_model_overrides_default() {
        let req = GenerateRequest::builder()
            .messages(vec![Message::user("hi")])
            .model(Some("override".to_string()))
            .build()
            .unwrap();
        let chat = to_chat_request(&req, "default").unwrap();
        assert_eq!(chat.model(), "override");
    }

    #[test]
    fn test_empty_request_rejected() {
        let err = to_chat_request(&GenerateRequest::default(), "m").unwrap_err();
        assert!(matches!(err.kind, ModelsErrorKind::InvalidRequest(_)));
    }

    #[test]
    fn test_usage_total_derived_when_missing() {
        let usage = ChatUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 0,
        };
        let converted = from_chat_response(&response("The butler.", Some(usage)), "p").unwrap();
        assert_eq!(converted.text(), "The butler.");
        assert_eq!(*converted.usage(), Some(TokenUsage::new(10, 5, 15)));
    }

    #[test]
    fn test_null_content_is_an_error() {
        let mut null = response("x", None);
        null.choices[0].message.content = None;
        let err = from_chat_response(&null, "p").unwrap_err();
        assert!(matches!(err.kind, ModelsErrorKind::EmptyResponse(_)));
    }

    #[test]
    fn test_blank_content_is_an_error() {
        let err = from_chat_response(&response("   ", None), "p").unwrap_err();
        assert!(matches!(err.kind, ModelsErrorKind::EmptyResponse(_)));
    }
}
