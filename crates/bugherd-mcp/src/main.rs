//! BugHerd MCP server binary.
//!
//! This binary runs the MCP server using stdio transport.

use bugherd::{ApiKeySource, BugherdClient};
use bugherd_mcp::BugherdMcpServer;
use bugherd_mcp::cli::{self, Args};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = ApiKeySource::default().resolve() {
        tracing::warn!("{e} Tool calls will fail until it is set.");
    }

    serve(&args).await.inspect_err(cli::log_failure)
}

async fn serve(args: &Args) -> anyhow::Result<()> {
    let client = BugherdClient::new(args.config())?;
    let server = BugherdMcpServer::new(client);

    tracing::info!(api_url = %args.api_url, "BugHerd MCP server running on stdio");
    server.run().await?;

    Ok(())
}
