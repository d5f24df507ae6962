//! Completion driver trait.

use async_trait::async_trait;
use std::sync::Arc;
use whodunit_core::{GenerateRequest, GenerateResponse};
use whodunit_error::WhodunitResult;

/// Anything that can turn a [`GenerateRequest`] into generated text.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Perform one completion round trip.
    async fn generate(&self, request: &GenerateRequest) -> WhodunitResult<GenerateResponse>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;

    /// Model identifier requests are sent to.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<D> CompletionDriver for Arc<D>
where
    D: CompletionDriver + ?Sized,
{
    async fn generate(&self, request: &GenerateRequest) -> WhodunitResult<GenerateResponse> {
        (**self).generate(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
