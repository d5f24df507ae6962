//! Notification handles returned at submission.

use crate::TaskError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Identifier assigned to each submission, in submission order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display,
)]
#[display("task-{_0}")]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// Numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Single-resolution future for one submitted task.
///
/// Resolves to the task's value, or to a [`TaskError`] describing why there
/// is none. Dropping the handle does not cancel the task; it still runs in
/// its turn and the result is discarded.
#[derive(Debug)]
pub struct TaskHandle<T, E> {
    id: TaskId,
    receiver: oneshot::Receiver<Result<T, TaskError<E>>>,
}

impl<T, E> TaskHandle<T, E> {
    pub(crate) fn new(id: TaskId, receiver: oneshot::Receiver<Result<T, TaskError<E>>>) -> Self {
        Self { id, receiver }
    }

    /// Handle that is already settled with `error`.
    pub(crate) fn settled(id: TaskId, error: TaskError<E>) -> Self {
        let (sender, receiver) = oneshot::channel();
        // Receiver is alive, send cannot fail.
        let _ = sender.send(Err(error));
        Self { id, receiver }
    }

    /// Id of the submission this handle belongs to.
    pub fn id(&self) -> TaskId {
        self.id
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Result<T, TaskError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(settled)) => Poll::Ready(settled),
            // Sender dropped without settling: the worker stopped first.
            Poll::Ready(Err(_)) => Poll::Ready(Err(TaskError::Cancelled)),
            Poll::Pending => Poll::Pending,
        }
    }
}
