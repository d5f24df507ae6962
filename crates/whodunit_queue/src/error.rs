//! Settlement failures delivered through a [`crate::TaskHandle`].

use std::time::Duration;

/// Why a handle settled without a value.
///
/// `Failed` carries the task's own error untouched; every other variant is
/// produced by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError<E> {
    /// The task ran and returned an error.
    Failed(E),
    /// The task exceeded the configured timeout and was dropped.
    TimedOut(Duration),
    /// The task panicked; the payload message is kept.
    Panicked(String),
    /// The queue was already shut down at submission.
    Closed,
    /// The drain worker stopped before the task settled, as when the
    /// runtime shuts down. Dropping the queue alone never causes this.
    Cancelled,
}

impl<E> TaskError<E> {
    /// The task's own failure, if that is what this is.
    pub fn failure(&self) -> Option<&E> {
        match self {
            TaskError::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Consumes the error, returning the task's own failure if present.
    pub fn into_failure(self) -> Option<E> {
        match self {
            TaskError::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TaskError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Failed(e) => write!(f, "Task failed: {}", e),
            TaskError::TimedOut(limit) => write!(f, "Task timed out after {:?}", limit),
            TaskError::Panicked(msg) => write!(f, "Task panicked: {}", msg),
            TaskError::Closed => write!(f, "Queue is closed"),
            TaskError::Cancelled => write!(f, "Task was cancelled before it settled"),
        }
    }
}

impl<E> std::error::Error for TaskError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TaskError::Failed(e) => Some(e),
            _ => None,
        }
    }
}
