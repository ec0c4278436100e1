//! Error types for the MCP server.

use computer_control::BackendError;
use thiserror::Error;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Failures that stop the server or a single response write.
///
/// Problems with an individual request are answered with a JSON-RPC error
/// instead (see [`JsonRpcError`](crate::mcp::JsonRpcError)).
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reading stdin or writing stdout failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The computer-control backend could not be constructed.
    #[error("Backend setup failed: {0}")]
    Backend(#[from] BackendError),
}
