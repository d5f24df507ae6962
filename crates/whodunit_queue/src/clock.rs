//! Tick sources for the polling drain mode.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Source of drain ticks.
///
/// The queue calls [`Clock::tick`] between polling passes; the returned
/// future resolves when the next pass is due.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Wait until the next tick.
    async fn tick(&self, interval: Duration);
}

/// Ticks on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn tick(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}

/// Ticks only when told to.
///
/// Each call to [`ManualClock::advance`] releases that many ticks, whatever
/// the configured interval. Clones share the same tick budget.
#[derive(Debug, Clone)]
pub struct ManualClock {
    ticks: Arc<Semaphore>,
}

impl ManualClock {
    /// Creates a clock with no ticks released.
    pub fn new() -> Self {
        Self {
            ticks: Arc::new(Semaphore::new(0)),
        }
    }

    /// Release `ticks` more ticks.
    pub fn advance(&self, ticks: usize) {
        self.ticks.add_permits(ticks);
    }

    /// Ticks released but not yet consumed by the queue.
    pub fn pending_ticks(&self) -> usize {
        self.ticks.available_permits()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&self, _interval: Duration) {
        match self.ticks.acquire().await {
            Ok(permit) => permit.forget(),
            // The semaphore is never closed; park forever if it somehow is.
            Err(_) => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_clock_counts_ticks() {
        let clock = ManualClock::new();
        clock.advance(2);
        assert_eq!(clock.pending_ticks(), 2);

        clock.tick(Duration::from_secs(60)).await;
        assert_eq!(clock.pending_ticks(), 1);
    }

    #[tokio::test]
    async fn test_manual_clock_blocks_without_ticks() {
        let clock = ManualClock::new();
        let waited =
            tokio::time::timeout(Duration::from_millis(20), clock.tick(Duration::ZERO)).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_sleeps_for_interval() {
        let start = tokio::time::Instant::now();
        TokioClock.tick(Duration::from_secs(3)).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
