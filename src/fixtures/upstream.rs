//! Upstream sports-data API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::UpstreamError;
use crate::fixtures::bucket::CacheBucket;

/// Source of bucket contents.
#[async_trait]
pub trait SportsApi: Send + Sync {
    /// Fetches the raw records of one bucket.
    async fn fetch(&self, bucket: &CacheBucket) -> Result<Vec<Value>, UpstreamError>;
}

/// API-Sports response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

// == API-Sports Client ==
/// [`SportsApi`] over the API-Sports v3 REST API.
#[derive(Debug, Clone)]
pub struct ApiSportsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ApiSportsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(http, base_url, api_key)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Path and query of the upstream call for a bucket.
    fn request_for(bucket: &CacheBucket) -> (&'static str, Vec<(&'static str, String)>) {
        match bucket {
            CacheBucket::Date(date) => ("/fixtures", vec![("date", date.format("%Y-%m-%d").to_string())]),
            CacheBucket::Live => ("/fixtures", vec![("live", "all".to_string())]),
            CacheBucket::League(id) => (
                "/fixtures",
                vec![
                    ("league", id.to_string()),
                    ("season", current_season(Utc::now().date_naive()).to_string()),
                ],
            ),
            CacheBucket::LeagueInfo(id) => ("/leagues", vec![("id", id.to_string())]),
            CacheBucket::PopularLeagues => ("/leagues", vec![("current", "true".to_string())]),
        }
    }
}

#[async_trait]
impl SportsApi for ApiSportsClient {
    async fn fetch(&self, bucket: &CacheBucket) -> Result<Vec<Value>, UpstreamError> {
        let (path, query) = Self::request_for(bucket);
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching {} from upstream {}", bucket, url);

        let response = self
            .http
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;

        if has_errors(&envelope.errors) {
            return Err(UpstreamError::Api(envelope.errors.to_string()));
        }

        Ok(envelope.response)
    }
}

/// API-Sports reports failures in an `errors` field that is an empty array
/// or object on success.
fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// European seasons start in July and are named after their first year.
fn current_season(today: NaiveDate) -> i32 {
    if today.month() >= 7 {
        today.year()
    } else {
        today.year() - 1
    }
}
