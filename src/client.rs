//! API Client
//!
//! JSON fetch wrapper with a per-key response cache, stale-on-error
//! fallback and debug reporting. Used by components that talk to the
//! sports-data HTTP API.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheEntry;
use crate::debug::{ApiCallStatus, ApiDebugInfo, DebugCache};
use crate::error::FetchError;

/// Cache duration used when a caller does not pick one.
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Bound on one request, body included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const LIVE_FIXTURES_TTL: Duration = Duration::from_secs(30);
const FIXTURES_TTL: Duration = Duration::from_secs(5 * 60);
const LEAGUE_TTL: Duration = Duration::from_secs(60 * 60);
const POPULAR_LEAGUES_TTL: Duration = Duration::from_secs(30 * 60);

/// Per-call options of [`ApiClient::fetch_with_debug`].
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub component_name: String,
    /// Overrides the default `{component}:{endpoint}` key
    pub cache_key: Option<String>,
    pub enable_debug: bool,
}

impl FetchOptions {
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            cache_key: None,
            enable_debug: true,
        }
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }

    pub fn without_debug(mut self) -> Self {
        self.enable_debug = false;
        self
    }

    fn key_for(&self, endpoint: &str) -> String {
        self.cache_key
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.component_name, endpoint))
    }
}

// == API Client ==
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    cache: RwLock<HashMap<String, CacheEntry<Value>>>,
    debug: Arc<DebugCache>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, debug: Arc<DebugCache>) -> Self {
        Self::with_client(Client::new(), base_url, debug)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, debug: Arc<DebugCache>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_FETCH_TIMEOUT,
            cache: RwLock::new(HashMap::new()),
            debug,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // == Fetch With Debug ==
    /// GETs `endpoint` as JSON through the response cache.
    ///
    /// An unexpired cached value is returned without a request. On failure a
    /// cached value is returned even if expired; the error only surfaces
    /// when nothing was ever cached under the key.
    pub async fn fetch_with_debug(
        &self,
        endpoint: &str,
        options: &FetchOptions,
        cache_duration: Duration,
    ) -> Result<Value, FetchError> {
        let started = Instant::now();
        let key = options.key_for(endpoint);

        let cached = self.cache.read().await.get(&key).cloned();
        if let Some(entry) = &cached {
            if !entry.is_expired() {
                debug!("API cache HIT for {}", key);
                if options.enable_debug {
                    self.debug.record_cache_hit(&options.component_name).await;
                    self.report(options, endpoint, &key, ApiCallStatus::Cached, started, None)
                        .await;
                }
                return Ok(entry.value.clone());
            }
        }

        if options.enable_debug {
            self.debug.record_cache_miss(&options.component_name).await;
        }

        match self.get_json(endpoint).await {
            Ok(value) => {
                let entry = CacheEntry::new(key.clone(), value.clone(), "network")
                    .with_ttl_ms(cache_duration.as_millis() as u64);
                self.cache.write().await.insert(key.clone(), entry);
                if options.enable_debug {
                    self.report(options, endpoint, &key, ApiCallStatus::Success, started, None)
                        .await;
                }
                Ok(value)
            }
            Err(e) => match cached {
                Some(entry) => {
                    warn!("Fetch of {} failed ({}), serving stale cache", endpoint, e);
                    if options.enable_debug {
                        self.report(
                            options,
                            endpoint,
                            &key,
                            ApiCallStatus::Stale,
                            started,
                            Some(e.to_string()),
                        )
                        .await;
                    }
                    Ok(entry.value)
                }
                None => {
                    if options.enable_debug {
                        self.report(
                            options,
                            endpoint,
                            &key,
                            ApiCallStatus::Error,
                            started,
                            Some(e.to_string()),
                        )
                        .await;
                    }
                    Err(e)
                }
            },
        }
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.request_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.request_error(endpoint, e)
            } else {
                FetchError::Decode {
                    endpoint: endpoint.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn request_error(&self, endpoint: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                endpoint: endpoint.to_string(),
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            FetchError::Request {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }
        }
    }

    async fn report(
        &self,
        options: &FetchOptions,
        endpoint: &str,
        key: &str,
        status: ApiCallStatus,
        started: Instant,
        error: Option<String>,
    ) {
        self.debug
            .log_api_call(ApiDebugInfo {
                component: options.component_name.clone(),
                endpoint: endpoint.to_string(),
                status,
                duration_ms: started.elapsed().as_millis() as u64,
                cache_key: Some(key.to_string()),
                error,
                timestamp: Utc::now(),
            })
            .await;
    }

    // == Wrappers ==
    pub async fn fetch_live_fixtures(&self, component: &str) -> Result<Value, FetchError> {
        self.fetch_with_debug("/api/fixtures/live", &FetchOptions::new(component), LIVE_FIXTURES_TTL)
            .await
    }

    pub async fn fetch_fixtures(&self, component: &str, date: &str) -> Result<Value, FetchError> {
        let endpoint = format!("/api/fixtures/date/{}", date);
        self.fetch_with_debug(&endpoint, &FetchOptions::new(component), FIXTURES_TTL)
            .await
    }

    pub async fn fetch_league(&self, component: &str, league_id: u32) -> Result<Value, FetchError> {
        let endpoint = format!("/api/leagues/{}", league_id);
        self.fetch_with_debug(&endpoint, &FetchOptions::new(component), LEAGUE_TTL)
            .await
    }

    pub async fn fetch_popular_leagues(&self, component: &str) -> Result<Value, FetchError> {
        self.fetch_with_debug(
            "/api/leagues/popular",
            &FetchOptions::new(component),
            POPULAR_LEAGUES_TTL,
        )
        .await
    }

    // == Clear Cache ==
    /// Drops cached responses of one component, or all of them.
    pub async fn clear_cache(&self, component: Option<&str>) -> usize {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        match component {
            Some(name) => cache.retain(|key, _| !key.starts_with(name)),
            None => cache.clear(),
        }
        before - cache.len()
    }

    pub async fn cached_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[cfg(test)]
    async fn expire(&self, key: &str) {
        if let Some(entry) = self.cache.write().await.get_mut(key) {
            entry.expires_at = Some(0);
        }
    }
}
