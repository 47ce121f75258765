//! Logo Manager
//!
//! Resolves team logos, country flags and league logos:
//! cache hit → return; miss → resolve candidates → validate →
//! cache and return, or cache and return the fallback asset.
//!
//! Lookups never fail. Every outcome is mirrored into the debug sink.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{is_fallback_url, CacheEntry, CacheStats, CleanupReport, LogoCache, LogoCacheConfig};
use crate::config::Config;
use crate::debug::{DebugCache, LogoDebugInfo};
use crate::error::ValidationError;
use crate::logos::countries::country_code;
use crate::logos::teams::{classify_team, TeamKind};
use crate::logos::types::{
    FlagRequest, LeagueLogoRequest, LogoKind, LogoResponse, LogoShape, TeamLogoRequest,
};
use crate::validation::LinkValidator;

pub const WORLD_FLAG_URL: &str = "https://hatscripts.github.io/circle-flags/flags/un.svg";
pub const EUROPE_FLAG_URL: &str = "https://hatscripts.github.io/circle-flags/flags/european_union.svg";
const CIRCLE_FLAG_BASE: &str = "https://hatscripts.github.io/circle-flags/flags";
const FLAG_CDN_BASE: &str = "https://flagcdn.com/w40";

/// URL fragments that mark a resolved logo as unusable.
const REJECTED_URL_PATTERNS: &[&str] = &["fallback", "placeholder.com"];

// == Settings ==
/// Resolution policy shared by the three lookups.
#[derive(Debug, Clone)]
pub struct LogoSettings {
    /// Static asset returned when nothing else resolves
    pub fallback_url: String,
    /// Leagues whose CDN logo is trusted without a HEAD check
    pub well_known_leagues: HashSet<u32>,
    /// Hosts tried in order for other leagues
    pub league_logo_hosts: Vec<String>,
    /// Deadline of each HEAD check
    pub validation_timeout: Duration,
    /// How long a cached fallback is served before resolution is retried
    pub retry_fallback_within: Duration,
}

impl LogoSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fallback_url: config.fallback_logo.clone(),
            well_known_leagues: config.well_known_leagues.iter().copied().collect(),
            league_logo_hosts: config.league_logo_hosts.clone(),
            validation_timeout: Duration::from_millis(config.logo_validation_timeout_ms),
            retry_fallback_within: Duration::from_secs(30 * 60),
        }
    }
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Why a lookup ended on the fallback asset.
#[derive(Error, Debug)]
enum LogoError {
    #[error("cannot resolve: {0}")]
    Unresolvable(String),

    #[error("rejected url {0}")]
    Rejected(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

struct Resolved {
    url: String,
    source: &'static str,
    verified: bool,
}

/// Per-instance stats of the three logo caches.
#[derive(Debug, Clone, Serialize)]
pub struct LogoCacheStats {
    pub team: CacheStats,
    pub league: CacheStats,
    pub flag: CacheStats,
}

// == Logo Manager ==
pub struct LogoManager {
    teams: RwLock<LogoCache>,
    leagues: RwLock<LogoCache>,
    flags: RwLock<LogoCache>,
    validator: Arc<dyn LinkValidator>,
    debug: Arc<DebugCache>,
    settings: LogoSettings,
}

impl LogoManager {
    pub fn new(
        settings: LogoSettings,
        validator: Arc<dyn LinkValidator>,
        debug: Arc<DebugCache>,
    ) -> Self {
        let fallback = settings.fallback_url.clone();
        Self::with_cache_configs(
            settings,
            validator,
            debug,
            [
                LogoCacheConfig::team().with_fallback_path(fallback.clone()),
                LogoCacheConfig::league().with_fallback_path(fallback.clone()),
                LogoCacheConfig::flag().with_fallback_path(fallback),
            ],
        )
    }

    /// Builds a manager with explicit team, league and flag cache configs.
    pub fn with_cache_configs(
        settings: LogoSettings,
        validator: Arc<dyn LinkValidator>,
        debug: Arc<DebugCache>,
        [team, league, flag]: [LogoCacheConfig; 3],
    ) -> Self {
        Self {
            teams: RwLock::new(LogoCache::new("team", team)),
            leagues: RwLock::new(LogoCache::new("league", league)),
            flags: RwLock::new(LogoCache::new("flag", flag)),
            validator,
            debug,
            settings,
        }
    }

    pub fn settings(&self) -> &LogoSettings {
        &self.settings
    }

    fn cache(&self, kind: LogoKind) -> &RwLock<LogoCache> {
        match kind {
            LogoKind::Team => &self.teams,
            LogoKind::League => &self.leagues,
            LogoKind::Flag => &self.flags,
        }
    }

    // == Team Logos ==
    pub async fn get_team_logo(&self, component: &str, request: &TeamLogoRequest) -> LogoResponse {
        let key = request.cache_key();
        self.lookup(component, LogoKind::Team, &key, || async {
            self.resolve_team(request)
        })
        .await
    }

    fn resolve_team(&self, request: &TeamLogoRequest) -> Result<Resolved, LogoError> {
        let id = request.team_id.trim();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(LogoError::Unresolvable(format!(
                "invalid team id '{}'",
                request.team_id
            )));
        }

        let (url, source) = match classify_team(&request.team_name) {
            TeamKind::National { .. } => (
                format!("/api/team-logo/circular/{}?size=32&sport={}", id, request.sport),
                "national-team",
            ),
            TeamKind::Club => (
                format!("/api/team-logo/square/{}?size=64&sport={}", id, request.sport),
                "club-team",
            ),
        };

        if is_rejected(&url) {
            return Err(LogoError::Rejected(url));
        }

        Ok(Resolved {
            url,
            source,
            verified: false,
        })
    }

    // == Country Flags ==
    pub async fn get_country_flag(&self, component: &str, request: &FlagRequest) -> LogoResponse {
        let key = request.cache_key();
        self.lookup(component, LogoKind::Flag, &key, || async {
            resolve_flag(request)
        })
        .await
    }

    // == League Logos ==
    pub async fn get_league_logo(
        &self,
        component: &str,
        request: &LeagueLogoRequest,
    ) -> LogoResponse {
        let key = request.cache_key();
        self.lookup(component, LogoKind::League, &key, || self.resolve_league(request))
            .await
    }

    async fn resolve_league(&self, request: &LeagueLogoRequest) -> Result<Resolved, LogoError> {
        let id = request.league_id;
        let hosts = &self.settings.league_logo_hosts;

        if self.settings.well_known_leagues.contains(&id) {
            let host = hosts
                .first()
                .map(String::as_str)
                .unwrap_or("https://media.api-sports.io");
            return Ok(Resolved {
                url: league_logo_url(host, id),
                source: "well-known",
                verified: false,
            });
        }

        let mut last_error = None;
        for host in hosts {
            let url = league_logo_url(host, id);
            match self.validator.check(&url, self.settings.validation_timeout).await {
                Ok(()) => {
                    return Ok(Resolved {
                        url,
                        source: "api-sports",
                        verified: true,
                    });
                }
                Err(e) => {
                    debug!(
                        "League {} logo candidate {} failed ({}): {}",
                        id,
                        url,
                        e.kind(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) => LogoError::Validation(e),
            None => LogoError::Unresolvable("no league logo hosts configured".to_string()),
        })
    }

    /// Marks a cached logo as confirmed, e.g. after a client reported it loaded.
    pub async fn mark_verified(&self, kind: LogoKind, key: &str) -> bool {
        self.cache(kind).write().await.mark_as_verified(key)
    }

    // == Lookup ==
    async fn lookup<F, Fut>(
        &self,
        component: &str,
        kind: LogoKind,
        key: &str,
        resolve: F,
    ) -> LogoResponse
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Resolved, LogoError>>,
    {
        let started = Instant::now();

        if let Some(entry) = self.cached_entry(kind, key).await {
            let response = LogoResponse {
                fallback_used: is_fallback_url(&entry.value, &self.settings.fallback_url),
                url: entry.value,
                cached: true,
                load_time_ms: started.elapsed().as_millis() as u64,
                source: entry.source,
            };
            self.report(component, kind, key, &response).await;
            return response;
        }

        // Lock released: validation below may take seconds.
        let response = match resolve().await {
            Ok(resolved) => {
                self.cache(kind)
                    .write()
                    .await
                    .set_cached(key, &resolved.url, resolved.source, resolved.verified);
                info!("Resolved {} logo {} -> {}", kind, key, resolved.url);
                LogoResponse {
                    url: resolved.url,
                    fallback_used: false,
                    cached: false,
                    load_time_ms: started.elapsed().as_millis() as u64,
                    source: resolved.source.to_string(),
                }
            }
            Err(e) => {
                match &e {
                    LogoError::Validation(ValidationError::Timeout(after)) => {
                        warn!("{} logo {} timed out after {:?}, using fallback", kind, key, after)
                    }
                    LogoError::Validation(ValidationError::Network(msg)) => {
                        warn!("{} logo {} network error: {}, using fallback", kind, key, msg)
                    }
                    other => warn!("{} logo {} failed: {}, using fallback", kind, key, other),
                }
                self.store_fallback(kind, key).await;
                self.fallback_response(started)
            }
        };

        self.report(component, kind, key, &response).await;
        response
    }

    /// Cached entry to serve, or None when the key must be resolved.
    ///
    /// A cached fallback is served for `retry_fallback_within`; after that
    /// it is re-resolved while its retry budget lasts.
    async fn cached_entry(&self, kind: LogoKind, key: &str) -> Option<CacheEntry<String>> {
        let mut cache = self.cache(kind).write().await;
        let entry = cache.get_cached(key)?;

        if !is_fallback_url(&entry.value, &self.settings.fallback_url) {
            return Some(entry);
        }

        let window = self.settings.retry_fallback_within.as_millis() as u64;
        if !entry.is_older_than(window) {
            return Some(entry);
        }

        if cache.increment_retry(key) {
            debug!("Retrying cached fallback for {} logo {}", kind, key);
            None
        } else {
            Some(entry)
        }
    }

    /// Caches the fallback for `key`. A fallback already cached keeps its
    /// retry count and only has its timestamp refreshed.
    async fn store_fallback(&self, kind: LogoKind, key: &str) {
        let mut cache = self.cache(kind).write().await;
        let existing_is_fallback = cache
            .peek(key)
            .map(|entry| is_fallback_url(&entry.value, &self.settings.fallback_url));

        match existing_is_fallback {
            Some(true) => {
                cache.refresh(key);
            }
            Some(false) => {}
            None => cache.set_cached(key, &self.settings.fallback_url, "fallback", false),
        }
    }

    fn fallback_response(&self, started: Instant) -> LogoResponse {
        LogoResponse {
            url: self.settings.fallback_url.clone(),
            fallback_used: true,
            cached: false,
            load_time_ms: started.elapsed().as_millis() as u64,
            source: "fallback".to_string(),
        }
    }

    async fn report(&self, component: &str, kind: LogoKind, key: &str, response: &LogoResponse) {
        self.debug
            .log_logo_load(LogoDebugInfo {
                component: component.to_string(),
                kind,
                cache_key: key.to_string(),
                url: response.url.clone(),
                fallback_used: response.fallback_used,
                cached: response.cached,
                load_time_ms: response.load_time_ms,
                timestamp: Utc::now(),
            })
            .await;
    }

    // == Maintenance ==
    /// Runs a cleanup pass over the three caches.
    pub async fn cleanup(&self) -> CleanupReport {
        let mut total = CleanupReport::default();
        for kind in [LogoKind::Team, LogoKind::League, LogoKind::Flag] {
            let report = self.cache(kind).write().await.cleanup();
            total.expired += report.expired;
            total.evicted += report.evicted;
        }
        total
    }

    pub async fn stats(&self) -> LogoCacheStats {
        LogoCacheStats {
            team: self.teams.read().await.stats(),
            league: self.leagues.read().await.stats(),
            flag: self.flags.read().await.stats(),
        }
    }

    /// Returns the cached entry for a key without TTL checks.
    pub async fn peek(&self, kind: LogoKind, key: &str) -> Option<CacheEntry<String>> {
        self.cache(kind).read().await.peek(key).cloned()
    }

    pub async fn clear(&self) {
        for kind in [LogoKind::Team, LogoKind::League, LogoKind::Flag] {
            self.cache(kind).write().await.clear();
        }
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, kind: LogoKind, key: &str, age: Duration) {
        self.cache(kind).write().await.backdate(key, age);
    }
}

fn resolve_flag(request: &FlagRequest) -> Result<Resolved, LogoError> {
    let country = request.country.trim();
    match country {
        "World" => {
            return Ok(Resolved {
                url: WORLD_FLAG_URL.to_string(),
                source: "flag-fixed",
                verified: false,
            })
        }
        "Europe" => {
            return Ok(Resolved {
                url: EUROPE_FLAG_URL.to_string(),
                source: "flag-fixed",
                verified: false,
            })
        }
        _ => {}
    }

    let code = country_code(country)
        .ok_or_else(|| LogoError::Unresolvable(format!("unknown country '{}'", country)))?;

    let url = match request.shape {
        LogoShape::Circular => format!("{}/{}.svg", CIRCLE_FLAG_BASE, code),
        LogoShape::Square => format!("{}/{}.png", FLAG_CDN_BASE, code),
    };

    Ok(Resolved {
        url,
        source: "flag-table",
        verified: false,
    })
}

fn league_logo_url(host: &str, league_id: u32) -> String {
    format!("{}/football/leagues/{}.png", host.trim_end_matches('/'), league_id)
}

fn is_rejected(url: &str) -> bool {
    REJECTED_URL_PATTERNS.iter().any(|p| url.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Validator with a fixed answer that counts calls.
    struct StubValidator {
        calls: AtomicUsize,
        result: Result<(), ValidationError>,
    }

    impl StubValidator {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Ok(()),
            })
        }

        fn failing(error: ValidationError) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result: Err(error),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LinkValidator for StubValidator {
        async fn check(&self, _url: &str, _timeout: Duration) -> Result<(), ValidationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn manager(validator: Arc<StubValidator>) -> LogoManager {
        LogoManager::new(LogoSettings::default(), validator, Arc::new(DebugCache::new()))
    }

    fn league(id: u32) -> LeagueLogoRequest {
        LeagueLogoRequest {
            league_id: id,
            league_name: None,
        }
    }

    #[tokio::test]
    async fn well_known_league_skips_validation() {
        let validator = StubValidator::ok();
        let manager = manager(validator.clone());

        let response = manager.get_league_logo("LeagueHeader", &league(39)).await;

        assert_eq!(response.url, "https://media.api-sports.io/football/leagues/39.png");
        assert!(!response.fallback_used);
        assert!(!response.cached);
        assert_eq!(validator.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_league_validated_and_cached() {
        let validator = StubValidator::ok();
        let manager = manager(validator.clone());

        let first = manager.get_league_logo("LeagueHeader", &league(999)).await;
        let second = manager.get_league_logo("LeagueHeader", &league(999)).await;

        assert_eq!(first.url, "https://media.api-sports.io/football/leagues/999.png");
        assert_eq!(first.url, second.url);
        assert!(second.cached);
        assert_eq!(validator.calls(), 1);

        let entry = manager.peek(LogoKind::League, "league-999").await.unwrap();
        assert!(entry.verified);
    }

    #[tokio::test]
    async fn failing_league_falls_back_and_is_cached() {
        let validator = StubValidator::failing(ValidationError::Timeout(Duration::from_secs(5)));
        let manager = manager(validator.clone());

        let response = manager.get_league_logo("LeagueHeader", &league(999_999)).await;

        assert_eq!(response.url, "/assets/fallback-logo.svg");
        assert!(response.fallback_used);

        let entry = manager.peek(LogoKind::League, "league-999999").await.unwrap();
        assert_eq!(entry.source, "fallback");

        let again = manager.get_league_logo("LeagueHeader", &league(999_999)).await;
        assert!(again.cached);
        assert!(again.fallback_used);
        assert_eq!(validator.calls(), 1);
    }

    #[tokio::test]
    async fn stale_fallback_is_retried_until_budget_exhausted() {
        let validator = StubValidator::failing(ValidationError::Network("refused".into()));
        let manager = manager(validator.clone());
        let request = league(123_456);

        manager.get_league_logo("LeagueHeader", &request).await;
        assert_eq!(validator.calls(), 1);

        // max_retries = 3: two more retries are allowed after the first failure
        for expected_calls in [2, 3] {
            manager
                .backdate(LogoKind::League, "league-123456", Duration::from_secs(31 * 60))
                .await;
            let response = manager.get_league_logo("LeagueHeader", &request).await;
            assert!(response.fallback_used);
            assert_eq!(validator.calls(), expected_calls);
        }

        manager
            .backdate(LogoKind::League, "league-123456", Duration::from_secs(31 * 60))
            .await;
        let response = manager.get_league_logo("LeagueHeader", &request).await;
        assert!(response.cached);
        assert_eq!(validator.calls(), 3);
    }

    #[tokio::test]
    async fn team_logo_endpoint_depends_on_team_kind() {
        let manager = manager(StubValidator::ok());

        let national = manager
            .get_team_logo(
                "MatchCard",
                &TeamLogoRequest {
                    team_id: "6".into(),
                    team_name: "Brazil".into(),
                    shape: LogoShape::Circular,
                    sport: Default::default(),
                },
            )
            .await;
        assert_eq!(national.url, "/api/team-logo/circular/6?size=32&sport=football");

        let club = manager
            .get_team_logo(
                "MatchCard",
                &TeamLogoRequest {
                    team_id: "33".into(),
                    team_name: "Manchester United".into(),
                    shape: LogoShape::Square,
                    sport: Default::default(),
                },
            )
            .await;
        assert_eq!(club.url, "/api/team-logo/square/33?size=64&sport=football");
        assert_eq!(club.source, "club-team");
    }

    #[tokio::test]
    async fn rejected_team_url_falls_back() {
        let manager = manager(StubValidator::ok());

        let response = manager
            .get_team_logo(
                "MatchCard",
                &TeamLogoRequest {
                    team_id: "fallback".into(),
                    team_name: "Unknown FC".into(),
                    shape: LogoShape::Square,
                    sport: Default::default(),
                },
            )
            .await;

        assert!(response.fallback_used);
        assert_eq!(response.url, "/assets/fallback-logo.svg");
    }

    #[tokio::test]
    async fn flags_resolve_from_table() {
        let manager = manager(StubValidator::ok());

        let circular = manager
            .get_country_flag(
                "Standings",
                &FlagRequest {
                    country: "Brazil".into(),
                    shape: LogoShape::Circular,
                },
            )
            .await;
        assert_eq!(circular.url, "https://hatscripts.github.io/circle-flags/flags/br.svg");

        let square = manager
            .get_country_flag(
                "Standings",
                &FlagRequest {
                    country: "Brazil".into(),
                    shape: LogoShape::Square,
                },
            )
            .await;
        assert_eq!(square.url, "https://flagcdn.com/w40/br.png");

        let world = manager
            .get_country_flag(
                "Standings",
                &FlagRequest {
                    country: "World".into(),
                    shape: LogoShape::Square,
                },
            )
            .await;
        assert_eq!(world.url, WORLD_FLAG_URL);
    }

    #[tokio::test]
    async fn unknown_country_falls_back() {
        let manager = manager(StubValidator::ok());

        let response = manager
            .get_country_flag(
                "Standings",
                &FlagRequest {
                    country: "Atlantis".into(),
                    shape: LogoShape::Circular,
                },
            )
            .await;

        assert!(response.fallback_used);
        assert!(!response.url.is_empty());
    }

    #[tokio::test]
    async fn outcomes_reach_debug_sink() {
        let debug = Arc::new(DebugCache::new());
        let manager = LogoManager::new(LogoSettings::default(), StubValidator::ok(), debug.clone());

        manager.get_league_logo("LeagueHeader", &league(39)).await;
        manager.get_league_logo("LeagueHeader", &league(39)).await;

        let stats = debug.component_stats("LeagueHeader").await.unwrap();
        assert_eq!(stats.logo_loads, 2);
        assert_eq!(debug.cache_hit_rate("LeagueHeader").await, 50.0);
    }

    #[tokio::test]
    async fn mark_verified_updates_entry() {
        let manager = manager(StubValidator::ok());
        manager.get_league_logo("LeagueHeader", &league(39)).await;

        assert!(manager.mark_verified(LogoKind::League, "league-39").await);
        assert!(manager.peek(LogoKind::League, "league-39").await.unwrap().verified);
        assert!(!manager.mark_verified(LogoKind::Team, "team-football-1-circular").await);
    }
}
