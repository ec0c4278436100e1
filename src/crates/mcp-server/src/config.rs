//! Command-line and environment configuration.

use clap::Parser;
use computer_control::HttpBackendConfig;
use std::time::Duration;

/// Default address of the computer-control backend.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// MCP server exposing mouse, keyboard and wait tools
#[derive(Parser, Debug, Clone)]
#[command(name = "omnicontrol-mcp")]
#[command(version)]
#[command(about = "MCP stdio server exposing computer-control tools", long_about = None)]
pub struct Config {
    /// Base URL of the computer-control backend
    #[arg(long, env = "OMNICONTROL_BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend_url: String,

    /// Timeout for each backend request, in seconds (no timeout when unset)
    #[arg(long, env = "OMNICONTROL_BACKEND_TIMEOUT_SECS")]
    pub backend_timeout_secs: Option<u64>,

    /// Server name reported to clients during initialization
    #[arg(long, default_value = "omnicontrol")]
    pub server_name: String,

    /// Log filter, e.g. "info" or "omnicontrol_mcp=debug"
    #[arg(long, env = "OMNICONTROL_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Backend connection settings derived from the flags.
    pub fn backend_config(&self) -> HttpBackendConfig {
        let config = HttpBackendConfig::new(self.backend_url.clone());
        match self.backend_timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
