//! Cache Entry Module
//!
//! Defines the entry shared by every in-memory cache: the image cache, the
//! three logo caches and the JSON API client.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

// == Cache Entry ==
/// A single cached value with its provenance metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry<V> {
    /// Composite cache key, e.g. `team-football-33-circular`
    pub key: String,
    /// The stored value (a URL or a JSON payload)
    pub value: V,
    /// Creation or last refresh time (Unix milliseconds)
    pub timestamp: u64,
    /// Explicit expiration (Unix milliseconds). None = expiry derived by the owning cache
    pub expires_at: Option<u64>,
    /// Resolution path that produced the value
    pub source: String,
    /// Whether the value was confirmed reachable
    pub verified: bool,
    /// Failed validations since the last success
    pub retry_count: u32,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new unverified entry stamped with the current time.
    pub fn new(key: impl Into<String>, value: V, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            timestamp: current_timestamp_ms(),
            expires_at: None,
            source: source.into(),
            verified: false,
            retry_count: 0,
        }
    }

    /// Sets an explicit expiry `ttl_ms` milliseconds after the entry timestamp.
    pub fn with_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.expires_at = Some(self.timestamp + ttl_ms);
        self
    }

    /// Marks the entry as verified at construction.
    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    // == Age ==
    /// Milliseconds since the entry was created or last refreshed.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.timestamp)
    }

    // == Is Older Than ==
    /// Returns true once the entry age has reached `max_age_ms`.
    ///
    /// Boundary condition: an entry whose age equals the max age is expired.
    pub fn is_older_than(&self, max_age_ms: u64) -> bool {
        self.age_ms() >= max_age_ms
    }

    // == Is Expired ==
    /// Checks the explicit expiry, if any.
    ///
    /// Entries without `expires_at` never expire through this check; their
    /// owning cache applies its own age rule.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    /// Refreshes the timestamp to now.
    pub fn touch(&mut self) {
        self.timestamp = current_timestamp_ms();
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Returns true when `url` points at the configured fallback asset.
pub fn is_fallback_url(url: &str, fallback_path: &str) -> bool {
    !fallback_path.is_empty() && url.contains(fallback_path)
}
