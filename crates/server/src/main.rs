//! quire server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use quire_client::ArticlePipeline;
use quire_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        render_enabled = config.render_enabled,
        render_backend = ?config.render_backend,
        quality_gate_min_chars = config.quality_gate_min_chars,
        "Starting quire server on stdio transport"
    );

    let pipeline = ArticlePipeline::from_config(&config).await?;
    let handler = handler::QuireServer::new(Arc::new(pipeline));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
