//! Error types for action dispatch.

use thiserror::Error;

/// Result type for dispatcher validation.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Failures detected before the backend is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A mandatory parameter was absent (or JSON `null`).
    #[error("{0}")]
    MissingParameter(String),

    /// A parameter was present but had the wrong shape.
    #[error("Invalid value for '{field}': expected {expected}")]
    InvalidParameter { field: String, expected: String },

    /// The (button, click_type) pair has no backend action.
    #[error("Unsupported button/click_type: {button}/{click_type}")]
    UnsupportedCombination { button: String, click_type: String },
}

impl DispatchError {
    pub fn missing(message: impl Into<String>) -> Self {
        DispatchError::MissingParameter(message.into())
    }

    pub fn invalid(field: impl Into<String>, expected: impl Into<String>) -> Self {
        DispatchError::InvalidParameter {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// Failures reported by a [`ComputerBackend`](crate::ComputerBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend rejected or could not perform the action.
    /// The message is passed through to the caller verbatim.
    #[error("{0}")]
    Operational(String),

    /// Anything else that went wrong while talking to the backend.
    #[error("Unexpected error in computer backend: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// Check if the backend itself declared this failure.
    pub fn is_operational(&self) -> bool {
        matches!(self, BackendError::Operational(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Unexpected(err.to_string())
    }
}
