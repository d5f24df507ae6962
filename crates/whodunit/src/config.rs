//! Configuration loaded from `whodunit.toml`.
//!
//! ```toml
//! [api]
//! base_url = "https://api.openai.com/v1/chat/completions"
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! temperature = 0.8
//!
//! [queue]
//! mode = "polling"
//! interval_ms = 500
//! task_timeout_secs = 300
//!
//! [storage]
//! database_url = "whodunit.db"
//! ```
//!
//! Every field has a default, so a missing file or section is fine.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use whodunit_error::{ConfigError, WhodunitResult};
use whodunit_models::OpenAICompatibleClient;
use whodunit_narrative::GenerationSettings;
use whodunit_queue::QueueConfig;

/// File name searched for when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "whodunit.toml";

/// Environment variable that overrides every other API key source.
pub const API_KEY_OVERRIDE: &str = "WHODUNIT_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct WhodunitConfig {
    /// Completion endpoint
    api: ApiConfig,
    /// Call queue
    queue: QueueSettings,
    /// Novel database
    storage: StorageConfig,
}

/// Completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[serde(default)]
#[builder(setter(into), default)]
pub struct ApiConfig {
    /// Full URL of the chat completions endpoint
    base_url: String,
    /// Model identifier
    model: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// Key written directly in the file
    api_key: Option<String>,
    /// Sampling temperature
    temperature: Option<f32>,
    /// Completion length cap
    max_tokens: Option<u32>,
    /// Overall HTTP timeout per request
    request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            temperature: Some(0.8),
            max_tokens: None,
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Returns a builder for ApiConfig.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }
}

/// How the queue notices new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueMode {
    /// Start the next call as soon as the previous one settles
    #[default]
    EventDriven,
    /// Check for work on a fixed interval
    Polling,
}

/// Call queue settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct QueueSettings {
    /// Drain strategy
    mode: QueueMode,
    /// Tick interval in polling mode
    interval_ms: u64,
    /// Per-call deadline; unbounded when absent
    task_timeout_secs: Option<u64>,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            mode: QueueMode::default(),
            interval_ms: 1000,
            task_timeout_secs: None,
        }
    }
}

/// Novel database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file path or `:memory:`
    database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "whodunit.db".to_string(),
        }
    }
}

impl WhodunitConfig {
    /// Creates a configuration from its sections.
    pub fn new(api: ApiConfig, queue: QueueSettings, storage: StorageConfig) -> Self {
        Self {
            api,
            queue,
            storage,
        }
    }

    /// Load and validate configuration from a TOML file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> WhodunitResult<Self> {
        let shown = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::in_file(&shown, format!("Failed to read config file: {}", e))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::in_file(&shown, format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults.
    ///
    /// An explicit path must exist. Without one, `whodunit.toml` in the
    /// working directory and then in the user config directory are tried,
    /// and defaults are used when neither exists.
    pub fn load(path: Option<&Path>) -> WhodunitResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(found) => Self::from_file(found),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Locations checked by [`WhodunitConfig::load`], in order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("whodunit").join(DEFAULT_CONFIG_FILE));
        }
        paths
    }

    /// Reject values that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::new("api.base_url must not be empty"));
        }
        if self.api.model.trim().is_empty() {
            return Err(ConfigError::new("api.model must not be empty"));
        }
        if let Some(t) = self.api.temperature
            && !(0.0..=2.0).contains(&t)
        {
            return Err(ConfigError::new(format!(
                "api.temperature must be between 0 and 2, got {}",
                t
            )));
        }
        if self.queue.mode == QueueMode::Polling && self.queue.interval_ms == 0 {
            return Err(ConfigError::new("queue.interval_ms must be positive"));
        }
        if self.queue.task_timeout_secs == Some(0) {
            return Err(ConfigError::new("queue.task_timeout_secs must be positive"));
        }
        Ok(())
    }

    /// The API key from the process environment.
    ///
    /// `WHODUNIT_API_KEY` wins, then `api.api_key`, then the variable named
    /// by `api.api_key_env`.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    /// [`WhodunitConfig::api_key`] with a custom environment lookup.
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &String| !key.trim().is_empty();
        lookup(API_KEY_OVERRIDE)
            .filter(present)
            .or_else(|| self.api.api_key.clone().filter(present))
            .or_else(|| lookup(&self.api.api_key_env).filter(present))
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "No API key: set {} or {}, or api.api_key in the config file",
                    API_KEY_OVERRIDE, self.api.api_key_env
                ))
            })
    }

    /// Queue configuration for completion calls.
    pub fn queue_config(&self) -> QueueConfig {
        let config = match self.queue.mode {
            QueueMode::EventDriven => QueueConfig::event_driven("completions"),
            QueueMode::Polling => QueueConfig::polling(
                "completions",
                Duration::from_millis(self.queue.interval_ms),
            ),
        };
        config.with_task_timeout(self.queue.task_timeout_secs.map(Duration::from_secs))
    }

    /// Sampling settings for the workflow.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.api.temperature)
            .max_tokens(self.api.max_tokens)
            .build()
            .unwrap_or_default()
    }

    /// HTTP client for the configured endpoint.
    pub fn client(&self, api_key: String) -> WhodunitResult<OpenAICompatibleClient> {
        let (model, url) = (self.api.model.clone(), self.api.base_url.clone());
        match self.api.request_timeout_secs {
            Some(secs) => {
                OpenAICompatibleClient::with_timeout(api_key, model, url, Duration::from_secs(secs))
            }
            None => Ok(OpenAICompatibleClient::new(api_key, model, url)),
        }
    }
}
