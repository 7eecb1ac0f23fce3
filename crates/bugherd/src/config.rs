//! Client configuration.
//!
//! The API key is never stored at construction time when it comes from the
//! environment: [`ApiKeySource::resolve`] reads it on every request so the
//! key can be set or rotated without restarting the server.

use crate::error::{Error, Result};
use std::time::Duration;

/// Production BugHerd API v2 base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.bugherd.com/api_v2";

/// Environment variable holding the BugHerd API key.
pub const API_KEY_ENV: &str = "BUGHERD_API_KEY";

/// Where the API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read the named environment variable at request time.
    Env(String),
    /// A fixed key.
    Fixed(String),
}

impl ApiKeySource {
    /// Resolve the API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] if the variable is unset or empty.
    pub fn resolve(&self) -> Result<String> {
        match self {
            Self::Env(var) => match std::env::var(var) {
                Ok(key) if !key.trim().is_empty() => Ok(key),
                _ => Err(Error::MissingApiKey { var: var.clone() }),
            },
            Self::Fixed(key) if !key.trim().is_empty() => Ok(key.clone()),
            Self::Fixed(_) => Err(Error::MissingApiKey {
                var: API_KEY_ENV.to_string(),
            }),
        }
    }
}

impl Default for ApiKeySource {
    fn default() -> Self {
        Self::Env(API_KEY_ENV.to_string())
    }
}

/// Retry behaviour for rate-limited (HTTP 429) responses.
///
/// The default performs no retries: a 429 is reported immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first rate-limited response.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// No retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(1000),
        }
    }

    /// Backoff delay before retry number `attempt` (0-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Configuration for [`crate::client::BugherdClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Source of the API key.
    pub api_key: ApiKeySource,
    /// Rate-limit retry policy.
    pub retry: RetryPolicy,
}

impl Config {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            api_key: ApiKeySource::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Use the given API key source.
    #[must_use]
    pub fn with_api_key(mut self, api_key: ApiKeySource) -> Self {
        self.api_key = api_key;
        self
    }

    /// Use the given retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_key, ApiKeySource::Env(API_KEY_ENV.to_string()));
        assert_eq!(config.retry.max_retries, 0);
    }

    #[rstest]
    #[case::no_slash("http://localhost:8080/api_v2", "http://localhost:8080/api_v2")]
    #[case::one_slash("http://localhost:8080/api_v2/", "http://localhost:8080/api_v2")]
    #[case::many_slashes("http://localhost:8080//", "http://localhost:8080")]
    fn test_base_url_trailing_slash_trimmed(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(Config::new(input).base_url, expected);
    }

    #[test]
    fn test_fixed_key_resolves() {
        let source = ApiKeySource::Fixed("abc123".to_string());
        assert_eq!(source.resolve().unwrap(), "abc123");
    }

    #[test]
    fn test_empty_fixed_key_is_missing() {
        let source = ApiKeySource::Fixed("  ".to_string());
        assert!(matches!(source.resolve(), Err(Error::MissingApiKey { .. })));
    }

    #[test]
    fn test_unset_env_key_is_missing() {
        let var = "BUGHERD_TEST_KEY_THAT_IS_NEVER_SET";
        let source = ApiKeySource::Env(var.to_string());
        match source.resolve() {
            Err(Error::MissingApiKey { var: name }) => assert_eq!(name, var),
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[rstest]
    #[case::first(0, 100)]
    #[case::second(1, 200)]
    #[case::third(2, 400)]
    fn test_retry_delay_doubles(#[case] attempt: u32, #[case] expected_ms: u64) {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(attempt), Duration::from_millis(expected_ms));
    }
}
