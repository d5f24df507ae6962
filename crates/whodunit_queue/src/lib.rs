//! Sequential task queue.
//!
//! [`TaskQueue`] runs asynchronous units of work strictly one at a time, in
//! the order they were submitted. Each submission returns a [`TaskHandle`]
//! that settles exactly once with the task's result or failure. A failing
//! task never affects the entries behind it.
//!
//! ```rust,ignore
//! use whodunit_queue::{QueueConfig, TaskQueue};
//!
//! let queue = TaskQueue::new(QueueConfig::default());
//! let first = queue.submit(|| async { Ok::<_, String>("A") });
//! let second = queue.submit(|| async { Err::<&str, _>("boom".to_string()) });
//! assert_eq!(first.await.unwrap(), "A");
//! assert!(second.await.is_err());
//! ```

mod clock;
mod config;
mod entry;
mod error;
mod handle;
mod queue;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::{DrainMode, QueueConfig, QueueConfigBuilder};
pub use error::TaskError;
pub use handle::{TaskHandle, TaskId};
pub use queue::{QueueState, QueueStats, TaskQueue};
