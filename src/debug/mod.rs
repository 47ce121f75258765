//! Debug Module
//!
//! Process-wide observability sink. Records cache hits and misses, API
//! calls and logo loads per component so they can be inspected through the
//! `/api/debug` endpoints. Nothing else in the crate reads this state back;
//! clearing it has no functional effect.

mod ring;

pub use ring::RingBuffer;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::logos::LogoKind;

/// Capacity of each event log.
pub const DEBUG_LOG_CAPACITY: usize = 1000;

// == Event Types ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiCallStatus {
    Success,
    Cached,
    Stale,
    Error,
}

/// One JSON API call made by a component.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDebugInfo {
    pub component: String,
    pub endpoint: String,
    pub status: ApiCallStatus,
    pub duration_ms: u64,
    pub cache_key: Option<String>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One logo resolution.
#[derive(Debug, Clone, Serialize)]
pub struct LogoDebugInfo {
    pub component: String,
    pub kind: LogoKind,
    pub cache_key: String,
    pub url: String,
    pub fallback_used: bool,
    pub cached: bool,
    pub load_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Running counters for one component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub api_calls: u64,
    pub errors: u64,
    pub logo_loads: u64,
    pub fallbacks: u64,
    pub last_updated: DateTime<Utc>,
}

impl Default for ComponentCacheStats {
    fn default() -> Self {
        Self {
            hits: 0,
            misses: 0,
            api_calls: 0,
            errors: 0,
            logo_loads: 0,
            fallbacks: 0,
            last_updated: Utc::now(),
        }
    }
}

impl ComponentCacheStats {
    /// Hit rate in percent, 0 without data.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugSummary {
    pub components: usize,
    pub total_hits: u64,
    pub total_misses: u64,
    pub hit_rate: f64,
    pub api_calls: u64,
    pub api_errors: u64,
    pub logo_loads: u64,
    pub fallbacks: u64,
    pub buffered_api_calls: usize,
    pub buffered_logo_loads: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugExport {
    pub generated_at: DateTime<Utc>,
    pub components: BTreeMap<String, ComponentCacheStats>,
    pub api_calls: Vec<ApiDebugInfo>,
    pub logo_loads: Vec<LogoDebugInfo>,
}

#[derive(Debug)]
struct DebugState {
    components: HashMap<String, ComponentCacheStats>,
    api_calls: RingBuffer<ApiDebugInfo>,
    logo_loads: RingBuffer<LogoDebugInfo>,
}

impl DebugState {
    fn component(&mut self, name: &str) -> &mut ComponentCacheStats {
        let stats = self.components.entry(name.to_string()).or_default();
        stats.last_updated = Utc::now();
        stats
    }
}

// == Debug Cache ==
/// Shared sink for cache and fetch events. Construct once, share via `Arc`.
#[derive(Debug)]
pub struct DebugCache {
    state: RwLock<DebugState>,
}

impl DebugCache {
    pub fn new() -> Self {
        Self::with_capacity(DEBUG_LOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(DebugState {
                components: HashMap::new(),
                api_calls: RingBuffer::new(capacity),
                logo_loads: RingBuffer::new(capacity),
            }),
        }
    }

    pub async fn record_cache_hit(&self, component: &str) {
        self.state.write().await.component(component).hits += 1;
    }

    pub async fn record_cache_miss(&self, component: &str) {
        self.state.write().await.component(component).misses += 1;
    }

    pub async fn log_api_call(&self, info: ApiDebugInfo) {
        let mut state = self.state.write().await;
        let stats = state.component(&info.component);
        stats.api_calls += 1;
        if info.status == ApiCallStatus::Error {
            stats.errors += 1;
        }
        state.api_calls.push(info);
    }

    pub async fn log_logo_load(&self, info: LogoDebugInfo) {
        let mut state = self.state.write().await;
        let stats = state.component(&info.component);
        stats.logo_loads += 1;
        if info.cached {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        if info.fallback_used {
            stats.fallbacks += 1;
        }
        state.logo_loads.push(info);
    }

    /// hits / (hits + misses) * 100 for one component, 0 without data.
    pub async fn cache_hit_rate(&self, component: &str) -> f64 {
        self.state
            .read()
            .await
            .components
            .get(component)
            .map(ComponentCacheStats::hit_rate)
            .unwrap_or(0.0)
    }

    pub async fn component_stats(&self, component: &str) -> Option<ComponentCacheStats> {
        self.state.read().await.components.get(component).cloned()
    }

    pub async fn recent_api_calls(&self, limit: usize) -> Vec<ApiDebugInfo> {
        let state = self.state.read().await;
        state.api_calls.iter_newest().take(limit).cloned().collect()
    }

    pub async fn recent_logo_loads(&self, limit: usize) -> Vec<LogoDebugInfo> {
        let state = self.state.read().await;
        state.logo_loads.iter_newest().take(limit).cloned().collect()
    }

    pub async fn summary(&self) -> DebugSummary {
        let state = self.state.read().await;
        let mut summary = DebugSummary {
            components: state.components.len(),
            total_hits: 0,
            total_misses: 0,
            hit_rate: 0.0,
            api_calls: 0,
            api_errors: 0,
            logo_loads: 0,
            fallbacks: 0,
            buffered_api_calls: state.api_calls.len(),
            buffered_logo_loads: state.logo_loads.len(),
        };

        for stats in state.components.values() {
            summary.total_hits += stats.hits;
            summary.total_misses += stats.misses;
            summary.api_calls += stats.api_calls;
            summary.api_errors += stats.errors;
            summary.logo_loads += stats.logo_loads;
            summary.fallbacks += stats.fallbacks;
        }

        let total = summary.total_hits + summary.total_misses;
        if total > 0 {
            summary.hit_rate = summary.total_hits as f64 / total as f64 * 100.0;
        }
        summary
    }

    pub async fn export(&self) -> DebugExport {
        let state = self.state.read().await;
        DebugExport {
            generated_at: Utc::now(),
            components: state
                .components
                .iter()
                .map(|(name, stats)| (name.clone(), stats.clone()))
                .collect(),
            api_calls: state.api_calls.to_vec(),
            logo_loads: state.logo_loads.to_vec(),
        }
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.components.clear();
        state.api_calls.clear();
        state.logo_loads.clear();
    }
}

impl Default for DebugCache {
    fn default() -> Self {
        Self::new()
    }
}
