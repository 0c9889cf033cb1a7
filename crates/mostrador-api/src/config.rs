//! # Gateway Configuration
//!
//! Connection settings for the backend, normally filled in by the store
//! layer's client config (env vars) and handed to [`Gateway::new`].
//!
//! [`Gateway::new`]: crate::client::Gateway::new

use std::time::Duration;

/// Default request timeout. The backend is expected on the local network;
/// anything slower than this reads as "down" at the counter.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Where and how to reach the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `http://localhost:3000`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Bearer token to start with, when a session already exists.
    pub bearer: Option<String>,
}

impl ApiConfig {
    /// Creates a config pointing at the given base URL with defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        ApiConfig {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            bearer: None,
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Starts with an existing bearer token (restored session).
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let config = ApiConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_builder_chain() {
        let config = ApiConfig::new("https://pos.example.com")
            .with_timeout(Duration::from_secs(5))
            .with_bearer("token123");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.bearer.as_deref(), Some("token123"));
    }
}
