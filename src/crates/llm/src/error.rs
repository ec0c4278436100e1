//! Error types for Gemini generation.
//!
//! The `Display` text of each variant is exactly what ends up in
//! [`GenerationOutcome::text`](crate::GenerationOutcome) when a call fails.

use thiserror::Error;

/// Result type for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Errors that can occur while setting up or performing a generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The client could not be constructed (missing credential, HTTP stack unavailable).
    #[error("Gemini client unavailable: {0}")]
    ClientUnavailable(String),

    /// A request or response object lacked a field we expected.
    #[error("Error setting up Gemini call (shape mismatch): {0}.")]
    ShapeMismatch(String),

    /// The request was rejected as malformed.
    #[error("Type error during Gemini call (check arguments/version): {0}.")]
    InvalidArgument(String),

    /// HTTP request failed.
    #[error("Error interacting with Gemini API: HttpError - {0}")]
    Http(#[from] reqwest::Error),

    /// API authentication failed.
    #[error("Error interacting with Gemini API: AuthenticationError - {0}")]
    Authentication(String),

    /// Rate limit exceeded.
    #[error("Error interacting with Gemini API: RateLimitExceeded - {0}")]
    RateLimitExceeded(String),

    /// Any other non-success answer from the API.
    #[error("Error interacting with Gemini API: ApiError - {status}: {message}")]
    Api { status: u16, message: String },
}

impl GenerationError {
    /// Short name of the failure class, as used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::ClientUnavailable(_) => "ClientUnavailable",
            GenerationError::ShapeMismatch(_) => "ShapeMismatch",
            GenerationError::InvalidArgument(_) => "InvalidArgument",
            GenerationError::Http(_) => "HttpError",
            GenerationError::Authentication(_) => "AuthenticationError",
            GenerationError::RateLimitExceeded(_) => "RateLimitExceeded",
            GenerationError::Api { .. } => "ApiError",
        }
    }

    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            GenerationError::Authentication(_) | GenerationError::ClientUnavailable(_)
        )
    }
}
