//! HTTP transport failures.

/// Request that never produced a usable response, with source location.
///
/// Non-2xx responses are not transport failures; they surface as
/// [`crate::ModelsErrorKind::Api`].
#[derive(Debug, Clone, derive_more::Error)]
pub struct HttpError {
    /// Endpoint the request targeted, when known
    pub url: Option<String>,
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Transport failure at the current location.
    ///
    /// ```
    /// use whodunit_error::HttpError;
    ///
    /// let err = HttpError::new("connection reset").with_url("http://localhost:9/v1");
    /// assert!(err.to_string().contains("http://localhost:9/v1"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            url: None,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Attach the endpoint that failed.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP Error: {}", self.message)?;
        if let Some(url) = &self.url {
            write!(f, " ({})", url)?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
