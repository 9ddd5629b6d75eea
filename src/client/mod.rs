//! Cached, retrying access to the GraphQL service.
//!
//! [`GatewayClient::request`] is the single entry point every accessor goes
//! through. A request either:
//!
//! 1. returns a fresh cached payload without touching the network, or
//! 2. fetches with bounded exponential backoff, caches the payload and
//!    returns it, or
//! 3. fails with a normalized [`GatewayError`]. Failures are never cached.
//!
//! Concurrent misses on the same key each perform their own fetch; the last
//! one to finish owns the cache entry.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheKey, ResponseCache};
use crate::config::{ClientConfig, ConfigError};
use crate::error::GatewayError;
use crate::http::{
    GraphQlRequest, GraphQlResponse, ReqwestTransport, Transport, TransportError, Variables,
    is_retriable_status,
};

pub mod retry;

pub use retry::{RetryPolicy, Sleep, TokioSleep};

/// Longest slice of an error body copied into logs.
const MAX_LOGGED_BODY: usize = 256;

/// Handle to the GraphQL gateway.
///
/// Construct one at the composition root and hand clones to callers; every
/// clone shares the same cache.
///
/// # Examples
///
/// ```rust,no_run
/// use anigate::{ClientConfig, GatewayClient};
/// use serde_json::Value;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GatewayClient::new(&ClientConfig::default())?;
///     let genres: Value = client.request("query { GenreCollection }", None, false).await?;
///     println!("{genres}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GatewayClient {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleep>,
    cache: ResponseCache,
    retry: RetryPolicy,
}

impl GatewayClient {
    /// Builds a client that talks to `config.endpoint` over HTTPS.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the endpoint is invalid or the HTTP
    /// client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Builds a client over an arbitrary transport. The endpoint in `config`
    /// is ignored; TTL and retry settings apply.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleep),
            cache: ResponseCache::new(config.cache_ttl()),
            retry: RetryPolicy::new(config.max_retries, config.base_delay()),
        }
    }

    /// Replaces the backoff sleeper.
    #[must_use]
    pub fn with_sleep(mut self, sleeper: Arc<dyn Sleep>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Runs `query` with `variables` and decodes the `data` payload as `T`.
    ///
    /// With `skip_cache` set, the network is always hit and a successful
    /// reply overwrites any cached entry.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::RateLimited`] — the service kept answering 429.
    /// - [`GatewayError::NotFound`] — the service answered 404.
    /// - [`GatewayError::Transient`] — a retriable status outlived every retry.
    /// - [`GatewayError::NonRetriable`] — anything else, including payloads
    ///   that do not decode as `T`.
    pub async fn request<T>(
        &self,
        query: &str,
        variables: Option<&Variables>,
        skip_cache: bool,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let key = CacheKey::new(query, variables);

        if !skip_cache {
            if let Some(payload) = self.cache.get(&key) {
                debug!(variables = key.variables(), "cache hit");
                return decode(&payload);
            }
        }

        let payload = self
            .fetch_with_retry(&GraphQlRequest::new(query, variables))
            .await?;
        let decoded = decode(&payload)?;
        self.cache.insert(key, payload);
        Ok(decoded)
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        debug!(entries = self.cache.len(), "clearing response cache");
        self.cache.clear();
    }

    /// Number of cached entries, stale ones included.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    async fn fetch_with_retry(&self, request: &GraphQlRequest<'_>) -> Result<Value, GatewayError> {
        let mut attempt = 0;

        loop {
            debug!(attempt, "sending graphql request");
            let status = match self.attempt(request).await {
                Ok(payload) => return Ok(payload),
                Err(status) => status,
            };

            if let Some(code) = status {
                if is_retriable_status(code) && self.retry.should_retry(attempt) {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        attempt,
                        status = code,
                        delay_ms = delay.as_millis() as u64,
                        "retriable failure, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                    continue;
                }
            }

            let error = GatewayError::from_status(status);
            warn!(attempt, status = ?status, error = ?error, "graphql request failed");
            return Err(error);
        }
    }

    // One exchange. Failures are reduced to the HTTP status that drives the
    // retry decision; `None` when there is none.
    async fn attempt(&self, request: &GraphQlRequest<'_>) -> Result<Value, Option<u16>> {
        match self.transport.execute(request).await {
            Ok(body) => GraphQlResponse::parse(&body)
                .and_then(GraphQlResponse::into_data)
                .map_err(|e| {
                    warn!(error = %e, "unusable graphql reply");
                    None
                }),
            Err(TransportError::Status { status, body }) => {
                let end = body.len().min(MAX_LOGGED_BODY);
                debug!(status, body = %String::from_utf8_lossy(&body[..end]), "error reply");
                Err(Some(status))
            }
            Err(e @ TransportError::Network(_)) => {
                warn!(error = %e, "transport failure");
                Err(None)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T, GatewayError> {
    T::deserialize(payload).map_err(|e| {
        warn!(error = %e, "payload does not match the expected shape");
        GatewayError::NonRetriable { status: None }
    })
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("cache", &self.cache)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::Deserialize;
    use serde_json::json;

    use super::retry::testing::RecordingSleep;
    use super::*;
    use crate::http::transport::testing::{Reply, ScriptedTransport};

    const QUERY: &str = "query ($a: Int) { Page { media { id } } }";

    fn client_with(transport: &Arc<ScriptedTransport>) -> (GatewayClient, Arc<RecordingSleep>) {
        let sleep = Arc::new(RecordingSleep::default());
        let client = GatewayClient::with_transport(&ClientConfig::default(), transport.clone())
            .with_sleep(sleep.clone());
        (client, sleep)
    }

    fn vars(value: Value) -> Variables {
        value.as_object().cloned().unwrap()
    }

    fn secs(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_secs).collect()
    }

    #[tokio::test]
    async fn identical_requests_fetch_once() {
        let transport = Arc::new(ScriptedTransport::new([Reply::Data(json!({ "n": 1 }))]));
        let (client, _) = client_with(&transport);
        let v = vars(json!({ "a": 1 }));

        let first: Value = client.request(QUERY, Some(&v), false).await.unwrap();
        let second: Value = client.request(QUERY, Some(&v), false).await.unwrap();

        assert_eq!(first, json!({ "n": 1 }));
        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_entry_is_refetched() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Data(json!(1)),
            Reply::Data(json!(2)),
        ]));
        let (client, _) = client_with(&transport);

        let _: Value = client.request(QUERY, None, false).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        let fresh: Value = client.request(QUERY, None, false).await.unwrap();
        assert_eq!(fresh, json!(1));
        assert_eq!(transport.call_count(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        let refreshed: Value = client.request(QUERY, None, false).await.unwrap();
        assert_eq!(refreshed, json!(2));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn skip_cache_always_fetches_and_overwrites() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Data(json!("old")),
            Reply::Data(json!("new")),
        ]));
        let (client, _) = client_with(&transport);

        let _: Value = client.request(QUERY, None, false).await.unwrap();
        let bypass: Value = client.request(QUERY, None, true).await.unwrap();
        assert_eq!(bypass, json!("new"));
        assert_eq!(transport.call_count(), 2);

        let cached: Value = client.request(QUERY, None, false).await.unwrap();
        assert_eq!(cached, json!("new"));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn persistent_503_is_tried_four_times() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Status(503)));
        let (client, sleep) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::Transient { status: 503 });
        assert_eq!(transport.call_count(), 4);
        assert_eq!(sleep.delays(), secs(&[1, 2, 4]));
    }

    #[tokio::test]
    async fn bad_request_fails_without_retry() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Status(400)));
        let (client, sleep) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::NonRetriable { status: Some(400) });
        assert_eq!(transport.call_count(), 1);
        assert!(sleep.delays().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_waits_one_two_four_seconds() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Status(502)));
        let client = GatewayClient::with_transport(&ClientConfig::default(), transport.clone());

        let _ = client.request::<Value>(QUERY, None, false).await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 4);
        let tolerance = Duration::from_millis(50);
        for (pair, expected) in calls.windows(2).zip(secs(&[1, 2, 4])) {
            let gap = pair[1].at - pair[0].at;
            assert!(
                gap >= expected && gap <= expected + tolerance,
                "gap {gap:?}, expected {expected:?}"
            );
        }
    }

    #[tokio::test]
    async fn rate_limit_is_retried_then_reported() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Status(429)));
        let (client, _) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::RateLimited);
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn not_found_is_reported_immediately() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Status(404)));
        let (client, _) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::NotFound);
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn network_failure_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::always(Reply::Network));
        let (client, sleep) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::NonRetriable { status: None });
        assert_eq!(transport.call_count(), 1);
        assert!(sleep.delays().is_empty());
    }

    #[tokio::test]
    async fn graphql_errors_in_success_reply_fail_the_request() {
        let transport = Arc::new(ScriptedTransport::new([Reply::Body(
            r#"{"errors":[{"message":"Syntax Error: Unexpected Name"}],"data":null}"#,
        )]));
        let (client, _) = client_with(&transport);

        let err = client.request::<Value>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::NonRetriable { status: None });
        assert_eq!(transport.call_count(), 1);
        assert_eq!(client.cached_entries(), 0);
    }

    #[tokio::test]
    async fn recovers_after_transient_failure() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Status(500),
            Reply::Status(504),
            Reply::Data(json!({ "ok": true })),
        ]));
        let (client, sleep) = client_with(&transport);

        let value: Value = client.request(QUERY, None, false).await.unwrap();

        assert_eq!(value, json!({ "ok": true }));
        assert_eq!(transport.call_count(), 3);
        assert_eq!(sleep.delays(), secs(&[1, 2]));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Status(503),
            Reply::Status(503),
            Reply::Status(503),
            Reply::Status(503),
            Reply::Data(json!("ok")),
        ]));
        let (client, _) = client_with(&transport);

        assert!(client.request::<Value>(QUERY, None, false).await.is_err());
        assert_eq!(client.cached_entries(), 0);

        let value: Value = client.request(QUERY, None, false).await.unwrap();
        assert_eq!(value, json!("ok"));
        assert_eq!(transport.call_count(), 5);
    }

    #[tokio::test]
    async fn undecodable_payload_is_rejected_and_not_cached() {
        #[derive(Debug, Deserialize)]
        struct Counted {
            #[allow(dead_code)]
            n: u32,
        }

        let transport = Arc::new(ScriptedTransport::new([Reply::Data(json!({ "n": "many" }))]));
        let (client, _) = client_with(&transport);

        let err = client.request::<Counted>(QUERY, None, false).await.unwrap_err();

        assert_eq!(err, GatewayError::NonRetriable { status: None });
        assert_eq!(client.cached_entries(), 0);
    }

    #[tokio::test]
    async fn clear_cache_forces_a_fetch() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Data(json!(1)),
            Reply::Data(json!(2)),
        ]));
        let (client, _) = client_with(&transport);

        let _: Value = client.request(QUERY, None, false).await.unwrap();
        client.clear_cache();
        assert_eq!(client.cached_entries(), 0);

        let value: Value = client.request(QUERY, None, false).await.unwrap();
        assert_eq!(value, json!(2));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn different_variable_values_do_not_share_an_entry() {
        let transport = Arc::new(ScriptedTransport::new([
            Reply::Data(json!("a=1")),
            Reply::Data(json!("a=2")),
        ]));
        let (client, _) = client_with(&transport);

        let one: Value = client.request(QUERY, Some(&vars(json!({ "a": 1 }))), false).await.unwrap();
        let two: Value = client.request(QUERY, Some(&vars(json!({ "a": 2 }))), false).await.unwrap();

        assert_eq!((one, two), (json!("a=1"), json!("a=2")));
        assert_eq!(transport.call_count(), 2);
        assert_eq!(client.cached_entries(), 2);
    }

    #[tokio::test]
    async fn variable_order_does_not_matter() {
        let transport = Arc::new(ScriptedTransport::new([Reply::Data(json!("shared"))]));
        let (client, _) = client_with(&transport);

        let mut ab = Variables::new();
        ab.insert("a".into(), json!(1));
        ab.insert("b".into(), json!(2));
        let mut ba = Variables::new();
        ba.insert("b".into(), json!(2));
        ba.insert("a".into(), json!(1));

        let _: Value = client.request(QUERY, Some(&ab), false).await.unwrap();
        let _: Value = client.request(QUERY, Some(&ba), false).await.unwrap();

        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn clones_share_one_cache() {
        let transport = Arc::new(ScriptedTransport::new([Reply::Data(json!(7))]));
        let (client, _) = client_with(&transport);
        let handle = client.clone();

        let _: Value = client.request(QUERY, None, false).await.unwrap();
        let value: Value = handle.request(QUERY, None, false).await.unwrap();

        assert_eq!(value, json!(7));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn request_forwards_query_and_variables() {
        let transport = Arc::new(ScriptedTransport::new([Reply::Data(empty_page())]));
        let (client, _) = client_with(&transport);
        let v = vars(json!({ "a": 3 }));

        let _: Value = client.request(QUERY, Some(&v), false).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].query, QUERY);
        assert_eq!(calls[0].variables, Some(v));
    }

    fn empty_page() -> Value {
        json!({ "Page": { "media": [] } })
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GatewayClient>();
    }
}
