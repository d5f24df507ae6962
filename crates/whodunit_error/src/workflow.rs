//! Mystery workflow error types.

/// Specific error conditions for workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkflowErrorKind {
    /// Brief failed validation
    InvalidBrief(String),
    /// Failed to parse the brief TOML
    TomlParse(String),
    /// Outline text contained no recognizable chapters
    OutlineParse(String),
    /// A stage was requested before its inputs exist
    MissingStage(String),
    /// Manuscript compilation attempted with undrafted chapters
    IncompleteDraft(Vec<usize>),
    /// Model produced no usable text for a stage
    EmptyGeneration(String),
}

impl std::fmt::Display for WorkflowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowErrorKind::InvalidBrief(msg) => write!(f, "Invalid brief: {}", msg),
            WorkflowErrorKind::TomlParse(msg) => write!(f, "Failed to parse TOML: {}", msg),
            WorkflowErrorKind::OutlineParse(msg) => {
                write!(f, "Could not parse outline: {}", msg)
            }
            WorkflowErrorKind::MissingStage(stage) => {
                write!(f, "Stage '{}' has not been completed yet", stage)
            }
            WorkflowErrorKind::IncompleteDraft(missing) => {
                write!(f, "Chapters not yet drafted: {:?}", missing)
            }
            WorkflowErrorKind::EmptyGeneration(stage) => {
                write!(f, "Model returned no text for stage '{}'", stage)
            }
        }
    }
}

/// Error type for workflow operations.
///
/// # Examples
///
/// ```
/// use whodunit_error::{WorkflowError, WorkflowErrorKind};
///
/// let err = WorkflowError::new(WorkflowErrorKind::MissingStage("outline".into()));
/// assert!(format!("{}", err).contains("outline"));
/// ```
#[derive(Debug, Clone)]
pub struct WorkflowError {
    /// The specific error condition
    pub kind: WorkflowErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl WorkflowError {
    /// Create a new WorkflowError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: WorkflowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Workflow Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for WorkflowError {}
