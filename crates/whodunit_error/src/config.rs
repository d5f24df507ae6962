//! Configuration and settings failures.

/// Invalid or unreadable settings, with source location.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// Settings file involved, if the problem came from one
    pub path: Option<String>,
    /// What is wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Settings error at the current location.
    ///
    /// ```
    /// use whodunit_error::ConfigError;
    ///
    /// let err = ConfigError::new("queue.interval_ms must be positive");
    /// assert!(err.path.is_none());
    /// assert!(err.to_string().starts_with("Configuration Error: queue.interval_ms"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            path: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Settings error raised while reading `path`.
    #[track_caller]
    pub fn in_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(message)
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration Error: {}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, " in {}", path)?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
