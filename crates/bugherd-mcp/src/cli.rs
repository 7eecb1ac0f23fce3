//! Command-line arguments for the `bugherd-mcp` binary.
//!
//! Every option can also be set through an environment variable, which is
//! how MCP hosts usually configure servers.

use bugherd::config::{ApiKeySource, Config, DEFAULT_BASE_URL, RetryPolicy};
use clap::Parser;
use std::time::Duration;

/// MCP server exposing BugHerd projects, tasks and comments over stdio.
///
/// The API key is read from `BUGHERD_API_KEY` on every request.
#[derive(Parser, Debug, Clone)]
#[command(name = "bugherd-mcp", version, about)]
pub struct Args {
    /// BugHerd API base URL
    #[arg(long, env = "BUGHERD_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Retries after a rate-limited (HTTP 429) response; 0 reports it immediately
    #[arg(long, env = "BUGHERD_MAX_RETRIES", default_value_t = 0)]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds, doubled on each attempt
    #[arg(
        long,
        env = "BUGHERD_RETRY_DELAY_MS",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub retry_delay_ms: u64,
}

impl Args {
    /// Client configuration for these arguments.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::new(self.api_url.clone())
            .with_api_key(ApiKeySource::default())
            .with_retry(RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.retry_delay_ms),
            })
    }
}

/// Log a fatal error to the same stderr stream as the startup messages.
pub fn log_failure(err: &anyhow::Error) {
    tracing::error!("BugHerd MCP server failed: {err:#}");
}
