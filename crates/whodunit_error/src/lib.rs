//! Error types for the whodunit toolkit.
//!
//! Every error records the source location where it was created. Crate-level
//! errors convert into [`WhodunitError`] so callers can propagate with `?`
//! across crate boundaries.

mod config;
mod database;
mod http;
mod io;
mod json;
mod models;
mod queue;
mod workflow;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use http::HttpError;
pub use io::IoError;
pub use json::JsonError;
pub use models::{ModelsError, ModelsErrorKind};
pub use queue::{QueueError, QueueErrorKind};
pub use workflow::{WorkflowError, WorkflowErrorKind};

/// Every error the toolkit can surface.
#[derive(Debug, Clone, derive_more::From)]
pub enum WhodunitErrorKind {
    /// HTTP transport error
    Http(HttpError),
    /// JSON serialization/deserialization error
    Json(JsonError),
    /// Filesystem error
    Io(IoError),
    /// Configuration error
    Config(ConfigError),
    /// Database error
    Database(DatabaseError),
    /// Completion endpoint error
    Models(ModelsError),
    /// Task queue error
    Queue(QueueError),
    /// Workflow error
    Workflow(WorkflowError),
}

impl std::fmt::Display for WhodunitErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WhodunitErrorKind::Http(e) => write!(f, "{}", e),
            WhodunitErrorKind::Json(e) => write!(f, "{}", e),
            WhodunitErrorKind::Io(e) => write!(f, "{}", e),
            WhodunitErrorKind::Config(e) => write!(f, "{}", e),
            WhodunitErrorKind::Database(e) => write!(f, "{}", e),
            WhodunitErrorKind::Models(e) => write!(f, "{}", e),
            WhodunitErrorKind::Queue(e) => write!(f, "{}", e),
            WhodunitErrorKind::Workflow(e) => write!(f, "{}", e),
        }
    }
}

/// Whodunit error with kind discrimination.
///
/// # Examples
///
/// ```
/// use whodunit_error::{HttpError, WhodunitError, WhodunitErrorKind};
///
/// let err: WhodunitError = HttpError::new("timeout").into();
/// assert!(matches!(err.kind(), WhodunitErrorKind::Http(_)));
/// ```
#[derive(Debug, Clone)]
pub struct WhodunitError(Box<WhodunitErrorKind>);

impl WhodunitError {
    /// Create a new error from a kind.
    pub fn new(kind: WhodunitErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &WhodunitErrorKind {
        &self.0
    }
}

impl std::fmt::Display for WhodunitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Whodunit Error: {}", self.0)
    }
}

impl std::error::Error for WhodunitError {}

impl<T> From<T> for WhodunitError
where
    T: Into<WhodunitErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for whodunit operations.
pub type WhodunitResult<T> = Result<T, WhodunitError>;
