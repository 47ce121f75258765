//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle against a mocked upstream
//! sports-data API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sports_cache::api::{create_router, AppState};
use sports_cache::cache::ImageCache;
use sports_cache::debug::DebugCache;
use sports_cache::fixtures::{ApiSportsClient, FixtureService, MemoryFixtureStore};
use sports_cache::images::ImageService;
use sports_cache::logos::{LogoManager, LogoSettings};
use sports_cache::validation::HttpValidator;
use sports_cache::Config;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// == Helper Functions ==

fn create_test_app(upstream: &MockServer) -> Router {
    let config = Config {
        sports_api_url: upstream.uri(),
        sports_api_key: "test-key".to_string(),
        ..Config::default()
    };
    let debug = Arc::new(DebugCache::new());
    let validator = Arc::new(HttpValidator::default());
    let client = ApiSportsClient::new(upstream.uri(), "test-key", Duration::from_secs(5));
    let fixtures = Arc::new(FixtureService::from_config(
        &config,
        Arc::new(MemoryFixtureStore::new()),
        Arc::new(client),
    ));
    let logos = Arc::new(LogoManager::new(
        LogoSettings::from_config(&config),
        validator.clone(),
        debug.clone(),
    ));
    let images = Arc::new(ImageService::new(ImageCache::default(), validator));
    create_router(AppState::new(fixtures, logos, images, debug))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn fixture(id: u64, league: &str, country: Value) -> Value {
    json!({
        "fixture": {"id": id, "date": "2026-10-18T15:00:00+00:00"},
        "league": {"id": 39, "name": league, "country": country},
        "teams": {"home": {"name": "Arsenal"}, "away": {"name": "Chelsea"}}
    })
}

fn envelope(response: Vec<Value>) -> Value {
    json!({"errors": [], "results": response.len(), "response": response})
}

// == Fixture Endpoint Tests ==

#[tokio::test]
async fn test_past_date_fetched_once_then_cached() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("date", "2026-10-18"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            fixture(1, "Premier League", json!("England")),
            fixture(2, "Esoccer Battle", json!("World")),
            fixture(3, "Club Friendlies", Value::Null),
            json!({"fixture": {"id": 4}}),
        ])))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/fixtures/date/2026-10-18").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2026-10-18");
    assert_eq!(body["count"], 1);

    let (status, body) = get_json(
        &app,
        "/api/fixtures/date/2026-10-18?exclude_esports=false&exclude_null_country=false",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_invalid_date_rejected_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![])))
        .expect(0)
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/fixtures/date/2026-13-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn test_upstream_errors_object_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": {"requests": "You have reached the request limit for the day"},
            "response": []
        })))
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/fixtures/live").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch data from upstream");
}

// == League Endpoint Tests ==

#[tokio::test]
async fn test_popular_leagues_filtered_to_configured_ids() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .and(query_param("current", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            json!({"league": {"id": 39, "name": "Premier League"}}),
            json!({"league": {"id": 4242, "name": "Regional Cup"}}),
            json!({"league": {"id": 2, "name": "UEFA Champions League"}}),
        ])))
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/leagues/popular").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    // Configured order puts the Champions League first
    assert_eq!(body["leagues"][0]["league"]["id"], 2);
    assert_eq!(body["leagues"][1]["league"]["id"], 39);
}

#[tokio::test]
async fn test_league_info_and_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .and(query_param("id", "39"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![json!({
            "league": {"id": 39, "name": "Premier League", "type": "League"},
            "country": {"name": "England", "code": "GB"}
        })])))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/leagues"))
        .and(query_param("id", "77777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![])))
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/leagues/39").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["league"]["name"], "Premier League");

    let (status, _) = get_json(&app, "/api/leagues/77777").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_league_fixtures() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fixtures"))
        .and(query_param("league", "39"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            fixture(10, "Premier League", json!("England")),
            fixture(11, "Premier League", json!("England")),
        ])))
        .expect(1)
        .mount(&upstream)
        .await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/leagues/39/fixtures").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (_, again) = get_json(&app, "/api/leagues/39/fixtures").await;
    assert_eq!(again["count"], 2);
}

// == Logo and Debug Endpoint Tests ==

#[tokio::test]
async fn test_well_known_league_logo() {
    let upstream = MockServer::start().await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/api/logos/league/39").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://media.api-sports.io/football/leagues/39.png");
    assert_eq!(body["fallback_used"], false);
    assert_eq!(body["cached"], false);
}

#[tokio::test]
async fn test_debug_export_records_logo_loads() {
    let upstream = MockServer::start().await;
    let app = create_test_app(&upstream);

    get_json(&app, "/api/logos/flag/Germany?component=Standings").await;
    get_json(&app, "/api/logos/flag/Germany?component=Standings").await;

    let (status, export) = get_json(&app, "/api/debug/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["logo_loads"].as_array().unwrap().len(), 2);
    assert_eq!(export["logo_loads"][0]["cached"], true);
    assert_eq!(export["components"]["Standings"]["hits"], 1);
    assert_eq!(export["components"]["Standings"]["misses"], 1);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = MockServer::start().await;
    let app = create_test_app(&upstream);

    let (status, body) = get_json(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let upstream = MockServer::start().await;
    let app = create_test_app(&upstream);

    let (status, _) = get_json(&app, "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
