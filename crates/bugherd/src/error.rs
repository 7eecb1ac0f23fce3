//! Error types for BugHerd API operations.

use thiserror::Error;

/// The error type for BugHerd API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The API key is not available in the configured source.
    #[error("{var} environment variable is not set. Set it to your BugHerd API key.")]
    MissingApiKey {
        /// Name of the environment variable that was read.
        var: String,
    },

    /// The API rejected the credential (HTTP 401).
    #[error("BugHerd authentication failed. Check that your BUGHERD_API_KEY is valid.")]
    Unauthorized,

    /// The API rate limit was hit (HTTP 429).
    #[error("BugHerd API rate limit exceeded. Please wait before retrying.")]
    RateLimited,

    /// The requested resource does not exist (HTTP 404).
    #[error("BugHerd resource not found: {path}")]
    NotFound {
        /// The request path that was not found.
        path: String,
    },

    /// Any other non-success response.
    #[error("BugHerd API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Connection-level failure.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON for the expected shape.
    #[error("Invalid JSON response from {path}: {source}")]
    Decode {
        /// The request path.
        path: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Client configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is the rate-limit signal.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// A specialized Result type for BugHerd operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_includes_path() {
        let err = Error::NotFound {
            path: "/projects/7.json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "BugHerd resource not found: /projects/7.json"
        );
    }

    #[test]
    fn test_api_error_includes_status_and_body() {
        let err = Error::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "BugHerd API error (500): boom");
    }

    #[test]
    fn test_missing_api_key_names_variable() {
        let err = Error::MissingApiKey {
            var: "BUGHERD_API_KEY".to_string(),
        };
        assert!(err.to_string().starts_with("BUGHERD_API_KEY"));
    }

    #[test]
    fn test_is_rate_limited() {
        assert!(Error::RateLimited.is_rate_limited());
        assert!(!Error::Unauthorized.is_rate_limited());
    }
}
