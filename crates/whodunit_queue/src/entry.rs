//! Pending units of work.

use crate::{TaskError, TaskId};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

/// How an executed entry settled, as seen by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub(crate) enum Outcome {
    Succeeded,
    Failed,
    TimedOut,
    Panicked,
}

type Run = Box<dyn FnOnce(Option<Duration>) -> BoxFuture<'static, Outcome> + Send>;

/// One submitted task together with the channel that notifies its caller.
///
/// The task's result type is erased so a single queue can carry entries of
/// any shape. Running the entry executes the task and settles the caller's
/// handle before the returned future completes.
pub(crate) struct QueueEntry {
    id: TaskId,
    enqueued_at: Instant,
    run: Run,
}

impl QueueEntry {
    pub(crate) fn new<F, Fut, T, E>(
        id: TaskId,
        task: F,
        notify: oneshot::Sender<Result<T, TaskError<E>>>,
    ) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let run: Run = Box::new(move |timeout| {
            async move {
                let guarded = AssertUnwindSafe(async move { task().await }).catch_unwind();
                let settled = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, guarded).await {
                        Ok(caught) => flatten(caught),
                        Err(_) => Err(TaskError::TimedOut(limit)),
                    },
                    None => flatten(guarded.await),
                };

                let outcome = match &settled {
                    Ok(_) => Outcome::Succeeded,
                    Err(TaskError::TimedOut(_)) => Outcome::TimedOut,
                    Err(TaskError::Panicked(_)) => Outcome::Panicked,
                    Err(_) => Outcome::Failed,
                };

                // The caller may have dropped its handle; the result is discarded then.
                let _ = notify.send(settled);
                outcome
            }
            .boxed()
        });

        Self {
            id,
            enqueued_at: Instant::now(),
            run,
        }
    }

    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn waited(&self) -> Duration {
        self.enqueued_at.elapsed()
    }

    /// Execute the task and settle its handle.
    pub(crate) async fn execute(self, timeout: Option<Duration>) -> Outcome {
        (self.run)(timeout).await
    }
}

impl std::fmt::Debug for QueueEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEntry")
            .field("id", &self.id)
            .field("enqueued_at", &self.enqueued_at)
            .finish_non_exhaustive()
    }
}

fn flatten<T, E>(
    caught: Result<Result<T, E>, Box<dyn std::any::Any + Send>>,
) -> Result<T, TaskError<E>> {
    match caught {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(TaskError::Failed(e)),
        Err(payload) => Err(TaskError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
