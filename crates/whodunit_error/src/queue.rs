//! Errors raised by the task queue itself, as opposed to the tasks it runs.

use std::time::Duration;

/// Queue-level outcomes that are not the task's own failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QueueErrorKind {
    /// Task exceeded the configured timeout
    #[display("Task timed out after {:?}", _0)]
    TimedOut(Duration),
    /// Task panicked while executing
    #[display("Task panicked: {}", _0)]
    Panicked(String),
    /// Queue was shut down before the task was submitted
    #[display("Queue is closed")]
    Closed,
    /// Queue worker stopped before the task settled
    #[display("Task was cancelled before it settled")]
    Cancelled,
}

/// Queue error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Queue Error: {} at line {} in {}", kind, line, file)]
pub struct QueueError {
    /// The kind of error that occurred
    pub kind: QueueErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QueueError {
    /// Create a new queue error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QueueErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
