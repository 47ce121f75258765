//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    debug_clear_handler, debug_export_handler, debug_stats_handler, fixtures_by_date_handler,
    flag_handler, health_handler, league_fixtures_handler, league_handler, league_logo_handler,
    live_fixtures_handler, popular_leagues_handler, team_logo_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/fixtures/date/:date` - Fixtures of one day
/// - `GET /api/fixtures/live` - Fixtures in play
/// - `GET /api/leagues/popular` - Curated league list
/// - `GET /api/leagues/:id` - League metadata
/// - `GET /api/leagues/:id/fixtures` - Fixtures of one league
/// - `GET /api/logos/team/:id`, `/api/logos/league/:id`, `/api/logos/flag/:country`
/// - `GET /api/debug/stats`, `GET /api/debug/export`, `DELETE /api/debug`
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/fixtures/date/:date", get(fixtures_by_date_handler))
        .route("/api/fixtures/live", get(live_fixtures_handler))
        .route("/api/leagues/popular", get(popular_leagues_handler))
        .route("/api/leagues/:id", get(league_handler))
        .route("/api/leagues/:id/fixtures", get(league_fixtures_handler))
        .route("/api/logos/team/:id", get(team_logo_handler))
        .route("/api/logos/league/:id", get(league_logo_handler))
        .route("/api/logos/flag/:country", get(flag_handler))
        .route("/api/debug/stats", get(debug_stats_handler))
        .route("/api/debug/export", get(debug_export_handler))
        .route("/api/debug", delete(debug_clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
