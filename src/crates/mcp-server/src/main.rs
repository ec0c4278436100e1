use anyhow::{Context, Result};
use clap::Parser;
use omnicontrol_mcp::{Config, McpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .with_ansi(false)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend_url = %config.backend_url,
        "starting omnicontrol MCP server"
    );

    let server = McpServer::from_config(&config).context("failed to initialize MCP server")?;
    server.run().await?;
    Ok(())
}
