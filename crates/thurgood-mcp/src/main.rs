//! Thurgood MCP Server
//!
//! Model Context Protocol server for the case.dev API
//! Run with: THURGOOD_API_KEY=xxx thurgood-mcp

use anyhow::Context;
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;
use thurgood_mcp::{ApiClient, ThurgoodService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();

    let api_client = ApiClient::from_env().context(
        "Failed to create API client. Check THURGOOD_BASE_URL, THURGOOD_TIMEOUT_MS and THURGOOD_CONFIG",
    )?;
    tracing::info!(base_url = %api_client.base_url(), "Starting thurgood MCP server");

    let service = ThurgoodService::new(api_client);
    let running = service.serve(stdio()).await.context("MCP transport failed")?;
    running.waiting().await.context("MCP server error")?;

    Ok(())
}
