//! Response cache keyed by GraphQL document and variables.
//!
//! Entries expire lazily: a stale entry stays in the map until it is
//! overwritten by a refresh or the whole cache is cleared, but lookups treat
//! it as a miss. Timestamps come from [`tokio::time::Instant`] so tests can
//! drive expiry with a paused clock.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::time::Instant;

use crate::http::Variables;

/// Identity of a request shape.
///
/// Two keys are equal exactly when the query text is identical and the
/// variables hold the same key/value pairs, regardless of insertion order.
/// An absent mapping and an empty one produce the same key.
///
/// # Examples
///
/// ```
/// use anigate::cache::CacheKey;
/// use serde_json::json;
///
/// let ab = json!({ "a": 1, "b": 2 });
/// let ba = json!({ "b": 2, "a": 1 });
/// assert_eq!(
///     CacheKey::new("q", ab.as_object()),
///     CacheKey::new("q", ba.as_object()),
/// );
/// assert_ne!(CacheKey::new("q", ab.as_object()), CacheKey::new("q", None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    variables: String,
}

impl CacheKey {
    pub fn new(query: &str, variables: Option<&Variables>) -> Self {
        let mut canonical = String::new();
        match variables {
            Some(vars) => write_object(vars, &mut canonical),
            None => canonical.push_str("{}"),
        }
        Self {
            query: query.to_owned(),
            variables: canonical,
        }
    }

    /// Returns the canonical JSON text of the variables.
    pub fn variables(&self) -> &str {
        &self.variables
    }
}

// Compact JSON with object keys sorted at every depth. Written out by hand so
// the result does not depend on serde_json's `preserve_order` feature.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => write_object(map, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => {
            let _ = write!(out, "{scalar}");
        }
    }
}

fn write_object(map: &Variables, out: &mut String) {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (name, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}:", Value::String(name.clone()));
        write_canonical(value, out);
    }
    out.push('}');
}

/// One memoized response payload.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

impl CacheEntry {
    /// Returns `true` while the entry's age at `now` is strictly below `ttl`.
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }
}

/// Shared, unbounded response cache with a fixed TTL.
///
/// Cloning yields another handle to the same entries.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: Arc<DashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Returns a copy of the payload stored under `key` if it is still fresh.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let entry = self.entries.get(key)?;
        entry
            .is_fresh(self.ttl, Instant::now())
            .then(|| entry.value.clone())
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
