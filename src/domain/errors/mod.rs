// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),
    /// Track position does not exist in the container
    #[error("Out of range: {0}")]
    OutOfRange(String),
    /// Probing tool unavailable, path missing or container unreadable
    #[error("Probe failed: {0}")]
    ProbeFail(String),
    /// External tool could not be spawned
    #[error("Tool unavailable: {0}")]
    ToolUnavailable(String),
    /// Remux tool ran and exited non-zero (code is None when killed by a signal)
    #[error("{tool} failed (exit code {code:?}): {stderr}")]
    ExecFail {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigFail(String),
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse error classification used by callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container could not be analysed
    Probe,
    /// The external remux tool failed
    Execution,
    /// The caller supplied something unusable before any tool ran
    Validation,
    /// File system or configuration trouble
    Environment,
}

impl DomainError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::ProbeFail(_) => ErrorKind::Probe,
            DomainError::ExecFail { .. } => ErrorKind::Execution,
            DomainError::BadArgs(_) | DomainError::FileNotFound(_) | DomainError::OutOfRange(_) => {
                ErrorKind::Validation
            }
            DomainError::ToolUnavailable(_)
            | DomainError::FsFail(_)
            | DomainError::ConfigFail(_)
            | DomainError::InternalError(_) => ErrorKind::Environment,
        }
    }

    /// Whether the external tool ran (and may have left a partial output behind)
    pub fn tool_ran(&self) -> bool {
        matches!(self, DomainError::ExecFail { .. })
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;
