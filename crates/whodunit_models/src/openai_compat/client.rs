//! Generic client for OpenAI-compatible APIs.

use crate::openai_compat::{ChatResponse, conversions};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};
use whodunit_core::{GenerateRequest, GenerateResponse};
use whodunit_error::{HttpError, ModelsError, ModelsErrorKind, WhodunitResult};
use whodunit_interface::CompletionDriver;

const PROVIDER: &str = "openai_compat";

/// Client for any API that speaks the OpenAI chat completions format.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer token for authentication
    /// * `model` - Default model identifier
    /// * `base_url` - Full URL of the chat completions endpoint
    #[instrument(skip(api_key), fields(model = %model, url = %base_url))]
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        debug!("Created OpenAI-compatible client");
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    /// Like [`OpenAICompatibleClient::new`] with an overall request timeout.
    pub fn with_timeout(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> WhodunitResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    /// Sends one chat completion request.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error on transport failure, a models error on a
    /// non-success status or an unusable body.
    #[instrument(skip(self, req), fields(model = %self.model, messages = req.messages().len()))]
    pub async fn complete(&self, req: &GenerateRequest) -> WhodunitResult<GenerateResponse> {
        let chat_request = conversions::to_chat_request(req, &self.model)?;

        debug!(model = %chat_request.model(), "Sending request");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                HttpError::new(format!("Request failed: {}", e)).with_url(&self.base_url)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(ModelsError::new(ModelsErrorKind::Api {
                status: status.as_u16(),
                message: error_text,
            })
            .into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            ModelsError::new(ModelsErrorKind::ResponseParsing(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(choices = chat_response.choices.len(), "Received response");

        Ok(conversions::from_chat_response(&chat_response, PROVIDER)?)
    }

    /// Endpoint URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionDriver for OpenAICompatibleClient {
    async fn generate(&self, request: &GenerateRequest) -> WhodunitResult<GenerateResponse> {
        self.complete(request).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
