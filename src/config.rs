//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.
//!
//! The well-known league allow-list, the popular league list and the esports
//! name patterns are deployment data, not fixed rules, so they are all
//! overridable here.

use std::env;
use std::str::FromStr;

/// League ids whose API-Sports CDN logo is trusted without validation.
pub const DEFAULT_WELL_KNOWN_LEAGUES: &[u32] = &[
    1, 2, 3, 4, 5, 9, 10, 11, 13, 15, 39, 40, 45, 48, 61, 62, 71, 78, 79, 88, 94, 135, 136, 140,
    141, 143, 179, 203, 207, 218, 253, 307, 848,
];

/// Leagues served by `GET /api/leagues/popular`.
pub const DEFAULT_POPULAR_LEAGUES: &[u32] = &[2, 3, 39, 140, 135, 78, 61, 1, 4, 5, 848, 45];

/// League name fragments that mark simulated or esports competitions.
pub const DEFAULT_ESPORTS_PATTERNS: &[&str] = &[
    "esoccer",
    "ebasketball",
    "cyber",
    "esports",
    "e-sports",
    "virtual",
    "simulated",
];

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream sports-data API
    pub sports_api_url: String,
    /// API key sent as `x-apisports-key`
    pub sports_api_key: String,
    /// Per-request timeout for upstream calls in seconds
    pub upstream_timeout: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Static asset served when no logo can be resolved
    pub fallback_logo: String,
    /// Capacity of the image URL cache
    pub image_cache_size: usize,
    /// HEAD timeout for league logo validation in milliseconds
    pub logo_validation_timeout_ms: u64,
    /// HEAD timeout for generic image validation in milliseconds
    pub image_validation_timeout_ms: u64,
    /// Logo hosts tried in order for unknown leagues
    pub league_logo_hosts: Vec<String>,
    pub well_known_leagues: Vec<u32>,
    pub popular_leagues: Vec<u32>,
    pub esports_patterns: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `SPORTS_API_URL` - Upstream base URL (default: `https://v3.football.api-sports.io`)
    /// - `SPORTS_API_KEY` - Upstream API key (default: empty)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 15)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 3600)
    /// - `FALLBACK_LOGO` - Fallback asset path (default: `/assets/fallback-logo.svg`)
    /// - `IMAGE_CACHE_SIZE` - Image cache capacity (default: 2000)
    /// - `LOGO_VALIDATION_TIMEOUT_MS` - League logo HEAD timeout (default: 5000)
    /// - `IMAGE_VALIDATION_TIMEOUT_MS` - Image HEAD timeout (default: 2000)
    /// - `LEAGUE_LOGO_HOSTS` - Comma separated logo hosts
    /// - `WELL_KNOWN_LEAGUES` - Comma separated league ids
    /// - `POPULAR_LEAGUES` - Comma separated league ids
    /// - `ESPORTS_PATTERNS` - Comma separated league name fragments
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sports_api_url: env::var("SPORTS_API_URL").unwrap_or(defaults.sports_api_url),
            sports_api_key: env::var("SPORTS_API_KEY").unwrap_or(defaults.sports_api_key),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fallback_logo: env::var("FALLBACK_LOGO").unwrap_or(defaults.fallback_logo),
            image_cache_size: env_or("IMAGE_CACHE_SIZE", defaults.image_cache_size),
            logo_validation_timeout_ms: env_or(
                "LOGO_VALIDATION_TIMEOUT_MS",
                defaults.logo_validation_timeout_ms,
            ),
            image_validation_timeout_ms: env_or(
                "IMAGE_VALIDATION_TIMEOUT_MS",
                defaults.image_validation_timeout_ms,
            ),
            league_logo_hosts: env_list("LEAGUE_LOGO_HOSTS").unwrap_or(defaults.league_logo_hosts),
            well_known_leagues: env_list("WELL_KNOWN_LEAGUES")
                .unwrap_or(defaults.well_known_leagues),
            popular_leagues: env_list("POPULAR_LEAGUES").unwrap_or(defaults.popular_leagues),
            esports_patterns: env_list("ESPORTS_PATTERNS").unwrap_or(defaults.esports_patterns),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            sports_api_url: "https://v3.football.api-sports.io".to_string(),
            sports_api_key: String::new(),
            upstream_timeout: 15,
            cleanup_interval: 3600,
            fallback_logo: "/assets/fallback-logo.svg".to_string(),
            image_cache_size: 2000,
            logo_validation_timeout_ms: 5000,
            image_validation_timeout_ms: 2000,
            league_logo_hosts: vec!["https://media.api-sports.io".to_string()],
            well_known_leagues: DEFAULT_WELL_KNOWN_LEAGUES.to_vec(),
            popular_leagues: DEFAULT_POPULAR_LEAGUES.to_vec(),
            esports_patterns: DEFAULT_ESPORTS_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses a comma separated variable. Unset, empty or unparsable values
/// yield None so the default applies.
fn env_list<T: FromStr>(name: &str) -> Option<Vec<T>> {
    let raw = env::var(name).ok()?;
    parse_list(&raw)
}

fn parse_list<T: FromStr>(raw: &str) -> Option<Vec<T>> {
    let items: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return None;
    }
    items.into_iter().map(|s| s.parse().ok()).collect()
}
