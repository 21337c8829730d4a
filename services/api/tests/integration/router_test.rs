//! Router-level tests for paths that are answered before any database work.
//!
//! The state carries a disconnected database and a Redis pool pointing at a
//! closed port, so cache calls fail fast and are treated as misses.

use axum::http::{HeaderName, StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use uuid::Uuid;

use worktunes_api::config::AppEnv;
use worktunes_api::infra::music::MusicClient;
use worktunes_api::infra::weather::OpenWeatherClient;
use worktunes_api::router::build_router;
use worktunes_api::state::AppState;
use worktunes_testing::auth::{MockAuth, keys};

fn test_server() -> TestServer {
    let redis = deadpool_redis::Config::from_url("redis://127.0.0.1:1")
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .unwrap();
    let state = AppState {
        db: DatabaseConnection::default(),
        redis,
        keys: keys(),
        weather: OpenWeatherClient {
            client: reqwest::Client::new(),
            base_url: "http://127.0.0.1:1".to_owned(),
            api_key: None,
        },
        music: MusicClient {
            client: reqwest::Client::new(),
            api_url: "http://127.0.0.1:1".to_owned(),
            token: None,
            app_env: AppEnv::Production,
        },
    };
    TestServer::new(build_router(state)).unwrap()
}

fn listener() -> MockAuth {
    MockAuth::new(Uuid::now_v7(), "listener@example.com")
}

// ── Health / middleware ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_with_request_id() {
    let server = test_server();

    let response = server.get("/healthz").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header");
    assert!(request_id.to_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn should_report_unready_dependencies() {
    let server = test_server();

    let response = server.get("/readyz").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["ready"], false);
    assert_eq!(json["checks"][0]["name"], "postgres");
    assert_eq!(json["checks"][0]["ok"], false);
    assert_eq!(json["checks"][1]["name"], "redis");
}

#[tokio::test]
async fn should_keep_incoming_request_id() {
    let server = test_server();

    let response = server
        .get("/healthz")
        .add_header(
            HeaderName::from_static("x-request-id"),
            header::HeaderValue::from_static("abc-123"),
        )
        .await;
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

// ── Bearer auth ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_access_token() {
    let server = test_server();

    let response = server.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "MISSING_TOKEN");
    assert_eq!(json["message"], "Access token is required");
}

#[tokio::test]
async fn should_reject_invalid_access_token() {
    let server = test_server();

    let response = server
        .get("/api/bgm/history")
        .add_header(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Bearer not-a-jwt"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let json: Value = response.json();
    assert_eq!(json["kind"], "INVALID_TOKEN");
    assert_eq!(json["message"], "Invalid or expired token");
}

#[tokio::test]
async fn should_reject_malformed_bgm_id() {
    let server = test_server();

    let response = server
        .get("/api/bgm/not-a-uuid")
        .add_header(header::AUTHORIZATION, listener().bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "path");
}

// ── Request validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_register_field_errors() {
    let server = test_server();

    let response = server
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "email": "not-an-email",
            "password": "short",
            "username": "ok-name"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "VALIDATION_ERROR");
    assert_eq!(json["message"], "Validation error");
    assert_eq!(json["errors"][0]["field"], "email");
    assert_eq!(json["errors"][1]["field"], "password");
    assert_eq!(
        json["errors"][1]["message"],
        "Password must be at least 8 characters"
    );
}

#[tokio::test]
async fn should_reject_blank_playlist_name() {
    let server = test_server();

    let response = server
        .post("/api/playlists")
        .add_header(header::AUTHORIZATION, listener().bearer())
        .json(&serde_json::json!({ "name": "   " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(json["errors"][0]["message"], "Name must be 1-100 characters");
}

#[tokio::test]
async fn should_reject_out_of_range_duration() {
    let server = test_server();

    let response = server
        .post("/api/bgm/generate")
        .add_header(header::AUTHORIZATION, listener().bearer())
        .json(&serde_json::json!({ "durationSeconds": 5 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["errors"][0]["field"], "duration_seconds");
}

// ── Environment ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_location_for_weather() {
    let server = test_server();

    let response = server.get("/api/environment/weather").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "LOCATION_REQUIRED");
    assert_eq!(
        json["message"],
        "Either coordinates (lat, lon) or city name is required"
    );
}

#[tokio::test]
async fn should_reject_out_of_range_latitude() {
    let server = test_server();

    let response = server
        .get("/api/environment/weather")
        .add_query_param("lat", 95)
        .add_query_param("lon", 10)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "lat");
}

#[tokio::test]
async fn should_reject_nan_coordinates() {
    let server = test_server();

    let response = server
        .get("/api/environment/weather")
        .add_query_param("lat", "NaN")
        .add_query_param("lon", "NaN")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "VALIDATION_ERROR");
    assert_eq!(json["errors"][0]["field"], "lat");
    assert_eq!(json["errors"][0]["message"], "Coordinates must be finite numbers");
}

#[tokio::test]
async fn should_serve_mock_weather_without_cache() {
    let server = test_server();

    let response = server
        .get("/api/environment/weather")
        .add_query_param("city", "Tokyo")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["location"], "Tokyo");
    assert_eq!(json["data"]["condition"], "clear");
    assert_eq!(json["data"]["conditionCode"], 800);
}

#[tokio::test]
async fn should_serve_current_environment_to_optional_auth() {
    let server = test_server();

    let response = server
        .get("/api/environment/current")
        .add_query_param("lat", 35.68)
        .add_query_param("lon", 139.76)
        .add_header(header::AUTHORIZATION, listener().bearer())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["data"]["weather"]["location"], "Current Location");
    assert!(json["data"]["timeOfDay"]["current"].is_string());
    assert!(json["data"]["musicParameters"]["bpmRange"].is_array());
}

#[tokio::test]
async fn should_serve_time_of_day() {
    let server = test_server();

    let response = server.get("/api/environment/time-of-day").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let json: Value = response.json();
    let hour = json["data"]["hour"].as_u64().unwrap();
    assert!(hour < 24);
    assert!(json["data"]["timeOfDay"].is_string());
}
