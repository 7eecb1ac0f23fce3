//! Error types for the BugHerd MCP server.

use thiserror::Error;

/// Errors that can occur while serving a tool call.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument value provided.
    #[error("Invalid {field}: '{value}'. {reason}")]
    InvalidArgument {
        /// The field name that had an invalid value.
        field: &'static str,
        /// The invalid value that was provided.
        value: String,
        /// What a valid value looks like.
        reason: &'static str,
    },

    /// The pre-flight connectivity check failed.
    #[error(
        "Failed to connect to the BugHerd API. Check that the BUGHERD_API_KEY environment variable is set and valid."
    )]
    ConnectionFailed,

    /// The requested tool does not exist.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An error from the BugHerd API client.
    #[error(transparent)]
    Api(#[from] bugherd::Error),

    /// MCP protocol or transport error.
    #[error("MCP error: {0}")]
    Mcp(String),
}

/// Result type for BugHerd MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
