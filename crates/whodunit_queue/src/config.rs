//! Queue configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the drain worker discovers pending work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrainMode {
    /// Wake as soon as work is submitted or the in-flight task settles.
    #[default]
    EventDriven,
    /// Check once per clock tick and start at most one entry per tick.
    Polling {
        /// Time between ticks
        interval: Duration,
    },
}

/// Configuration for a [`crate::TaskQueue`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct QueueConfig {
    /// Name used in log output
    #[builder(default = "String::from(\"default\")")]
    name: String,
    /// Drain strategy
    #[builder(default)]
    drain_mode: DrainMode,
    /// Per-task time limit; `None` lets a task run forever
    #[builder(default)]
    task_timeout: Option<Duration>,
}

impl QueueConfig {
    /// Returns a builder for QueueConfig.
    pub fn builder() -> QueueConfigBuilder {
        QueueConfigBuilder::default()
    }

    /// Event-driven queue with the given name.
    pub fn event_driven(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            drain_mode: DrainMode::EventDriven,
            task_timeout: None,
        }
    }

    /// Polling queue with the given name and tick interval.
    pub fn polling(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            drain_mode: DrainMode::Polling { interval },
            task_timeout: None,
        }
    }

    /// Returns a copy with a per-task timeout.
    pub fn with_task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self::event_driven("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = QueueConfig::builder().build().unwrap();
        assert_eq!(config, QueueConfig::default());
        assert_eq!(config.name(), "default");
        assert_eq!(*config.drain_mode(), DrainMode::EventDriven);
    }

    #[test]
    fn test_builder_overrides() {
        let config = QueueConfig::builder()
            .name("completions")
            .drain_mode(DrainMode::Polling {
                interval: Duration::from_secs(1),
            })
            .task_timeout(Some(Duration::from_secs(90)))
            .build()
            .unwrap();

        assert_eq!(config.name(), "completions");
        assert_eq!(*config.task_timeout(), Some(Duration::from_secs(90)));
    }
}
