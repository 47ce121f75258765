//! API Handlers
//!
//! HTTP request handlers for the fixture, league, logo and debug endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::cache::ImageCache;
use crate::config::Config;
use crate::debug::{DebugCache, DebugExport};
use crate::error::{AppError, Result};
use crate::fixtures::{parse_date, ApiSportsClient, FixtureService, MemoryFixtureStore};
use crate::images::ImageService;
use crate::logos::{
    FlagRequest, LeagueLogoRequest, LogoManager, LogoResponse, LogoSettings, TeamLogoRequest,
};
use crate::models::{
    ClearResponse, DebugStatsResponse, FixtureQuery, FixturesResponse, FlagQuery,
    HealthResponse, LeagueLogoQuery, LeaguesResponse, TeamLogoQuery,
};
use crate::validation::HttpValidator;

/// Component name reported for logo lookups that do not name one.
const DEFAULT_COMPONENT: &str = "api";

/// Entries of each debug log included in `GET /api/debug/stats`.
const RECENT_EVENTS: usize = 20;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub fixtures: Arc<FixtureService>,
    pub logos: Arc<LogoManager>,
    pub images: Arc<ImageService>,
    pub debug: Arc<DebugCache>,
}

impl AppState {
    pub fn new(
        fixtures: Arc<FixtureService>,
        logos: Arc<LogoManager>,
        images: Arc<ImageService>,
        debug: Arc<DebugCache>,
    ) -> Self {
        Self {
            fixtures,
            logos,
            images,
            debug,
        }
    }

    /// Wires the production services from configuration.
    ///
    /// One reqwest client backs the link validator; the upstream client
    /// carries its own timeout.
    pub fn from_config(config: &Config) -> Self {
        let debug = Arc::new(DebugCache::new());
        let validator = Arc::new(HttpValidator::new(Client::new()));

        let upstream = Arc::new(ApiSportsClient::new(
            config.sports_api_url.clone(),
            config.sports_api_key.clone(),
            Duration::from_secs(config.upstream_timeout),
        ));
        let fixtures = Arc::new(FixtureService::from_config(
            config,
            Arc::new(MemoryFixtureStore::new()),
            upstream,
        ));

        let logos = Arc::new(LogoManager::new(
            LogoSettings::from_config(config),
            validator.clone(),
            debug.clone(),
        ));
        let images = Arc::new(ImageService::with_timeout(
            ImageCache::new(config.image_cache_size),
            validator,
            Duration::from_millis(config.image_validation_timeout_ms),
        ));

        Self::new(fixtures, logos, images, debug)
    }
}

// == Fixtures ==
/// Handler for GET /api/fixtures/date/:date
pub async fn fixtures_by_date_handler(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<FixtureQuery>,
) -> Result<Json<FixturesResponse>> {
    let day = parse_date(&date).ok_or_else(|| {
        AppError::InvalidRequest(format!("Invalid date '{}', expected YYYY-MM-DD", date))
    })?;

    let fixtures = state.fixtures.fixtures_by_date(day, query.filter()).await?;
    Ok(Json(FixturesResponse::new(Some(date), fixtures)))
}

/// Handler for GET /api/fixtures/live
pub async fn live_fixtures_handler(
    State(state): State<AppState>,
    Query(query): Query<FixtureQuery>,
) -> Result<Json<FixturesResponse>> {
    let fixtures = state.fixtures.live_fixtures(query.filter()).await?;
    Ok(Json(FixturesResponse::new(None, fixtures)))
}

// == Leagues ==
/// Handler for GET /api/leagues/popular
pub async fn popular_leagues_handler(
    State(state): State<AppState>,
) -> Result<Json<LeaguesResponse>> {
    let leagues = state.fixtures.popular_leagues().await?;
    Ok(Json(LeaguesResponse::new(leagues)))
}

/// Handler for GET /api/leagues/:id
pub async fn league_handler(
    State(state): State<AppState>,
    Path(league_id): Path<u32>,
) -> Result<Json<Value>> {
    Ok(Json(state.fixtures.league_info(league_id).await?))
}

/// Handler for GET /api/leagues/:id/fixtures
pub async fn league_fixtures_handler(
    State(state): State<AppState>,
    Path(league_id): Path<u32>,
    Query(query): Query<FixtureQuery>,
) -> Result<Json<FixturesResponse>> {
    let fixtures = state
        .fixtures
        .league_fixtures(league_id, query.filter())
        .await?;
    Ok(Json(FixturesResponse::new(None, fixtures)))
}

// == Logos ==
/// Handler for GET /api/logos/team/:id
///
/// Never fails: unresolvable teams get the fallback asset.
pub async fn team_logo_handler(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(query): Query<TeamLogoQuery>,
) -> Json<LogoResponse> {
    let request = TeamLogoRequest {
        team_id,
        team_name: query.name,
        shape: query.shape,
        sport: query.sport,
    };
    let component = query.component.as_deref().unwrap_or(DEFAULT_COMPONENT);
    Json(state.logos.get_team_logo(component, &request).await)
}

/// Handler for GET /api/logos/league/:id
pub async fn league_logo_handler(
    State(state): State<AppState>,
    Path(league_id): Path<u32>,
    Query(query): Query<LeagueLogoQuery>,
) -> Json<LogoResponse> {
    let request = LeagueLogoRequest {
        league_id,
        league_name: query.name,
    };
    let component = query.component.as_deref().unwrap_or(DEFAULT_COMPONENT);
    Json(state.logos.get_league_logo(component, &request).await)
}

/// Handler for GET /api/logos/flag/:country
pub async fn flag_handler(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(query): Query<FlagQuery>,
) -> Json<LogoResponse> {
    let request = FlagRequest {
        country,
        shape: query.shape,
    };
    let component = query.component.as_deref().unwrap_or(DEFAULT_COMPONENT);
    Json(state.logos.get_country_flag(component, &request).await)
}

// == Debug ==
/// Handler for GET /api/debug/stats
pub async fn debug_stats_handler(State(state): State<AppState>) -> Json<DebugStatsResponse> {
    Json(DebugStatsResponse {
        summary: state.debug.summary().await,
        logo_caches: state.logos.stats().await,
        image_cache: state.images.stats().await,
        fixture_records: state.fixtures.record_count().await,
        recent_api_calls: state.debug.recent_api_calls(RECENT_EVENTS).await,
        recent_logo_loads: state.debug.recent_logo_loads(RECENT_EVENTS).await,
    })
}

/// Handler for GET /api/debug/export
pub async fn debug_export_handler(State(state): State<AppState>) -> Json<DebugExport> {
    Json(state.debug.export().await)
}

/// Handler for DELETE /api/debug
///
/// Clears the debug sink only; cached logos and fixtures stay.
pub async fn debug_clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.debug.clear().await;
    Json(ClearResponse::new("Debug data cleared"))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
