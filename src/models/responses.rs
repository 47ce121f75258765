//! Response DTOs for the HTTP API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::debug::{ApiDebugInfo, DebugSummary, LogoDebugInfo};
use crate::logos::LogoCacheStats;

/// Response body of the fixture list endpoints
#[derive(Debug, Clone, Serialize)]
pub struct FixturesResponse {
    /// Requested day, for `GET /api/fixtures/date/:date`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub count: usize,
    pub fixtures: Vec<Value>,
}

impl FixturesResponse {
    pub fn new(date: Option<String>, fixtures: Vec<Value>) -> Self {
        Self {
            date,
            count: fixtures.len(),
            fixtures,
        }
    }
}

/// Response body of `GET /api/leagues/popular`
#[derive(Debug, Clone, Serialize)]
pub struct LeaguesResponse {
    pub count: usize,
    pub leagues: Vec<Value>,
}

impl LeaguesResponse {
    pub fn new(leagues: Vec<Value>) -> Self {
        Self {
            count: leagues.len(),
            leagues,
        }
    }
}

/// Response body of `GET /api/debug/stats`
#[derive(Debug, Clone, Serialize)]
pub struct DebugStatsResponse {
    pub summary: DebugSummary,
    pub logo_caches: LogoCacheStats,
    pub image_cache: CacheStats,
    pub fixture_records: usize,
    pub recent_api_calls: Vec<ApiDebugInfo>,
    pub recent_logo_loads: Vec<LogoDebugInfo>,
}

/// Response body of `DELETE /api/debug`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
