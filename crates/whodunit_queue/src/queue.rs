//! The queue and its drain worker.

use crate::entry::{Outcome, QueueEntry};
use crate::{Clock, DrainMode, QueueConfig, TaskError, TaskHandle, TaskId, TokioClock};
use derive_getters::Getters;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Notify, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};

/// Whether a task is currently executing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum QueueState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// One task in flight.
    Busy,
}

/// Point-in-time view of queue activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct QueueStats {
    /// Tasks accepted since construction
    submitted: u64,
    /// Tasks that settled with a value
    succeeded: u64,
    /// Tasks that failed, timed out or panicked
    failed: u64,
    /// Tasks waiting to run
    pending: usize,
    /// Current state
    state: QueueState,
}

#[derive(Debug, Default)]
struct Inner {
    pending: VecDeque<QueueEntry>,
    state: QueueState,
    closed: bool,
    next_id: u64,
    submitted: u64,
    succeeded: u64,
    failed: u64,
}

#[derive(Debug)]
struct Shared {
    name: String,
    inner: Mutex<Inner>,
    wake: Notify,
    closed: watch::Sender<bool>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // No code panics while holding the lock; recover the data regardless.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pop the head entry and mark the queue busy, in one step.
    fn begin_next(&self) -> Option<QueueEntry> {
        let mut inner = self.lock();
        if inner.state == QueueState::Busy {
            return None;
        }
        let entry = inner.pending.pop_front()?;
        inner.state = QueueState::Busy;
        Some(entry)
    }

    fn finish(&self, outcome: Outcome) {
        let mut inner = self.lock();
        match outcome {
            Outcome::Succeeded => inner.succeeded += 1,
            Outcome::Failed | Outcome::TimedOut | Outcome::Panicked => inner.failed += 1,
        }
        inner.state = QueueState::Idle;
    }

    fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn close(&self) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        drop(inner);
        self.closed.send_replace(true);
        debug!(queue = %self.name, "Queue closed");
    }

    /// Close the queue and discard whatever is still waiting.
    ///
    /// Discarded entries drop their senders, so their handles resolve to
    /// [`TaskError::Cancelled`].
    fn abandon(&self) -> usize {
        let mut inner = self.lock();
        let discarded: Vec<_> = inner.pending.drain(..).collect();
        inner.state = QueueState::Idle;
        drop(inner);
        self.close();
        discarded.len()
    }

    /// Run the head entry if the queue is idle. Returns false when there was nothing to run.
    async fn drain_one(&self, timeout: Option<std::time::Duration>) -> bool {
        let Some(entry) = self.begin_next() else {
            return false;
        };

        let id = entry.id();
        let span = info_span!("queue.task", queue = %self.name, task_id = %id);
        debug!(
            parent: &span,
            waited_ms = entry.waited().as_millis() as u64,
            "Starting task"
        );

        let outcome = entry.execute(timeout).instrument(span.clone()).await;
        self.finish(outcome);

        match outcome {
            Outcome::Succeeded => debug!(parent: &span, "Task succeeded"),
            Outcome::Failed => debug!(parent: &span, "Task failed"),
            Outcome::TimedOut | Outcome::Panicked => {
                warn!(parent: &span, %outcome, "Task did not settle normally")
            }
        }
        true
    }
}

/// Serialized FIFO executor for asynchronous tasks.
///
/// At most one submitted task runs at any instant, and tasks start in
/// submission order. A background worker spawned on the current Tokio
/// runtime drains the queue; construct the queue from inside a runtime.
///
/// Dropping the queue stops it accepting work; entries already queued still
/// run in the background. If the runtime stops the worker first, the task in
/// flight and everything still queued settle as [`TaskError::Cancelled`].
#[derive(Debug)]
pub struct TaskQueue {
    shared: Arc<Shared>,
    config: QueueConfig,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TaskQueue {
    /// Create a queue that ticks on the Tokio timer.
    pub fn new(config: QueueConfig) -> Self {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create a queue with an injected tick source.
    ///
    /// The clock only matters in [`DrainMode::Polling`].
    #[instrument(skip(clock), fields(queue = %config.name()))]
    pub fn with_clock(config: QueueConfig, clock: Arc<dyn Clock>) -> Self {
        let (closed, closed_rx) = watch::channel(false);
        let shared = Arc::new(Shared {
            name: config.name().clone(),
            inner: Mutex::new(Inner::default()),
            wake: Notify::new(),
            closed,
        });

        let worker = tokio::spawn(drain_loop(
            Arc::clone(&shared),
            *config.drain_mode(),
            *config.task_timeout(),
            clock,
            closed_rx,
        ));

        info!(drain_mode = ?config.drain_mode(), "Task queue started");

        Self {
            shared,
            config,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Submit a task and get a handle to its eventual result.
    ///
    /// Never blocks. The task is not invoked until its turn. After
    /// [`TaskQueue::shutdown`] the handle resolves to [`TaskError::Closed`].
    pub fn submit<F, Fut, T, E>(&self, task: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let mut inner = self.shared.lock();
        inner.next_id += 1;
        let id = TaskId(inner.next_id);

        if inner.closed {
            drop(inner);
            warn!(queue = %self.shared.name, task_id = %id, "Rejected task on closed queue");
            return TaskHandle::settled(id, TaskError::Closed);
        }

        let (sender, receiver) = oneshot::channel();
        inner.pending.push_back(QueueEntry::new(id, task, sender));
        inner.submitted += 1;
        let pending = inner.pending.len();
        drop(inner);

        self.shared.wake.notify_one();
        debug!(queue = %self.shared.name, task_id = %id, pending, "Task submitted");

        TaskHandle::new(id, receiver)
    }

    /// Current state.
    pub fn state(&self) -> QueueState {
        self.shared.lock().state
    }

    /// Number of entries waiting to run (excludes the one in flight).
    pub fn len(&self) -> usize {
        self.shared.lock().pending.len()
    }

    /// True when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().pending.is_empty()
    }

    /// Whether the queue has stopped accepting work.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Activity counters.
    pub fn stats(&self) -> QueueStats {
        let inner = self.shared.lock();
        QueueStats {
            submitted: inner.submitted,
            succeeded: inner.succeeded,
            failed: inner.failed,
            pending: inner.pending.len(),
            state: inner.state,
        }
    }

    /// Configuration the queue was built with.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Stop accepting work, run everything already queued, then stop the worker.
    #[instrument(skip(self), fields(queue = %self.shared.name))]
    pub async fn shutdown(&self) {
        self.shared.close();
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                warn!(error = %e, "Drain worker ended abnormally");
            }
        }
        info!("Task queue stopped");
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.shared.close();
    }
}

/// Owned by the drain worker. Runs when the worker returns or when its task
/// is dropped mid-flight, e.g. by runtime shutdown.
struct WorkerGuard(Arc<Shared>);

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let discarded = self.0.abandon();
        if discarded > 0 {
            warn!(queue = %self.0.name, discarded, "Drain worker stopped with tasks pending");
        }
    }
}

async fn drain_loop(
    shared: Arc<Shared>,
    mode: DrainMode,
    timeout: Option<std::time::Duration>,
    clock: Arc<dyn Clock>,
    mut closed: watch::Receiver<bool>,
) {
    let _guard = WorkerGuard(Arc::clone(&shared));
    loop {
        let closing = *closed.borrow_and_update();
        if closing {
            while shared.drain_one(timeout).await {}
            debug!(queue = %shared.name, "Drain worker exiting");
            return;
        }

        match mode {
            DrainMode::EventDriven => {
                while shared.drain_one(timeout).await {}
                tokio::select! {
                    _ = shared.wake.notified() => {}
                    _ = closed.changed() => {}
                }
            }
            DrainMode::Polling { interval } => {
                tokio::select! {
                    _ = clock.tick(interval) => {
                        shared.drain_one(timeout).await;
                    }
                    _ = closed.changed() => {}
                }
            }
        }
    }
}
