//! Serialized access to a completion driver.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use whodunit_core::{GenerateRequest, GenerateResponse};
use whodunit_error::{QueueError, QueueErrorKind, WhodunitError, WhodunitResult};
use whodunit_interface::CompletionDriver;
use whodunit_queue::{TaskError, TaskQueue};

/// Routes every completion through a shared [`TaskQueue`].
///
/// However many callers use the driver at once, the wrapped driver sees one
/// request at a time, in the order they were made. The wrapped driver's own
/// errors come back unchanged.
#[derive(Debug)]
pub struct QueuedDriver<D> {
    inner: Arc<D>,
    queue: Arc<TaskQueue>,
}

impl<D> QueuedDriver<D> {
    /// Wraps `inner`, submitting its calls to `queue`.
    pub fn new(inner: D, queue: Arc<TaskQueue>) -> Self {
        Self {
            inner: Arc::new(inner),
            queue,
        }
    }

    /// The queue calls are submitted to.
    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    /// The wrapped driver.
    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D> Clone for QueuedDriver<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            queue: Arc::clone(&self.queue),
        }
    }
}

#[async_trait]
impl<D> CompletionDriver for QueuedDriver<D>
where
    D: CompletionDriver + 'static,
{
    #[instrument(skip_all, fields(queue = %self.queue.config().name()))]
    async fn generate(&self, request: &GenerateRequest) -> WhodunitResult<GenerateResponse> {
        let driver = Arc::clone(&self.inner);
        let request = request.clone();
        let handle = self
            .queue
            .submit(move || async move { driver.generate(&request).await });

        debug!(task_id = %handle.id(), "Completion queued");
        handle.await.map_err(settlement_error)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

fn settlement_error(err: TaskError<WhodunitError>) -> WhodunitError {
    let kind = match err {
        TaskError::Failed(e) => return e,
        TaskError::TimedOut(limit) => QueueErrorKind::TimedOut(limit),
        TaskError::Panicked(msg) => QueueErrorKind::Panicked(msg),
        TaskError::Closed => QueueErrorKind::Closed,
        TaskError::Cancelled => QueueErrorKind::Cancelled,
    };
    QueueError::new(kind).into()
}
