//! Client configuration.
//!
//! [`ClientConfig`] carries everything the gateway needs at construction
//! time. Defaults target the public AniList endpoint with a five minute
//! cache and three retries starting at one second.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Public AniList GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

/// How long a cached response stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// First backoff delay; doubled on each further retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Errors raised while building a client from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Settings for a [`GatewayClient`](crate::client::GatewayClient).
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use std::time::Duration;
/// use anigate::config::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{ "max_retries": 1, "cache_ttl_ms": 60000 }"#).unwrap();
/// assert_eq!(config.max_retries, 1);
/// assert_eq!(config.cache_ttl(), Duration::from_secs(60));
/// assert_eq!(config.endpoint, "https://graphql.anilist.co");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// GraphQL endpoint; must be an `http` or `https` URL.
    pub endpoint: String,
    pub cache_ttl_ms: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            cache_ttl_ms: DEFAULT_CACHE_TTL.as_millis() as u64,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl ClientConfig {
    /// Parses a JSON document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidEndpoint`] if the endpoint is unusable.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_ms = saturating_millis(ttl);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = saturating_millis(delay);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Parses the endpoint, accepting only `http` and `https` URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] otherwise.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };
        let url = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme `{other}`"))),
        }
    }

    /// Checks the configuration without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the endpoint is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url().map(|_| ())
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gateway_policy() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay(), Duration::from_secs(1));
        assert!(config.user_agent.starts_with("anigate/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::default()
            .with_endpoint("http://localhost:4000/graphql")
            .with_cache_ttl(Duration::from_secs(30))
            .with_max_retries(0)
            .with_base_delay(Duration::from_millis(250));
        assert_eq!(config.endpoint_url().unwrap().port(), Some(4000));
        assert_eq!(config.cache_ttl_ms, 30_000);
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.base_delay_ms, 250);
    }

    #[test]
    fn sub_second_ttl_is_kept() {
        let config = ClientConfig::default().with_cache_ttl(Duration::from_millis(1500));
        assert_eq!(config.cache_ttl(), Duration::from_millis(1500));

        let config = config.with_cache_ttl(Duration::from_millis(500));
        assert_eq!(config.cache_ttl(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = ClientConfig::default()
            .with_endpoint("ftp://example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
        assert!(err.to_string().contains("unsupported scheme `ftp`"));
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let err = ClientConfig::from_json(r#"{ "endpoint": "not a url" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ClientConfig::from_json("{ max_retries: 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
