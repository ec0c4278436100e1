//! omnicontrol MCP server
//!
//! Serves the computer-control dispatcher as Model Context Protocol tools over
//! newline-delimited JSON-RPC 2.0 on stdio.

pub mod config;
pub mod error;
pub mod mcp;
pub mod registry;
pub mod server;

// Re-exports
pub use config::Config;
pub use error::{Result, ServerError};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use server::{McpServer, ServerInfo};
