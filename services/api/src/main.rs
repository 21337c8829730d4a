use std::time::Duration;

use sea_orm::Database;
use tracing::info;

use worktunes_api::config::ApiConfig;
use worktunes_api::error::expose_internal_details;
use worktunes_api::infra::music::MusicClient;
use worktunes_api::infra::weather::OpenWeatherClient;
use worktunes_api::router::build_router;
use worktunes_api::state::AppState;
use worktunes_auth_types::token::JwtKeys;
use worktunes_core::tracing::init_tracing;

const WEATHER_TIMEOUT: Duration = Duration::from_secs(5);
const MUSIC_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing("info,worktunes_api=debug,tower_http=debug");

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let weather_http = reqwest::Client::builder()
        .timeout(WEATHER_TIMEOUT)
        .build()
        .expect("failed to build weather HTTP client");
    let music_http = reqwest::Client::builder()
        .timeout(MUSIC_TIMEOUT)
        .user_agent("WorkTunes-AI/1.0")
        .build()
        .expect("failed to build music HTTP client");

    if config.openweather_api_key.is_none() {
        info!("OPENWEATHER_API_KEY not set, weather lookups return mock data");
    }
    if config.genspark_token.is_none() {
        info!("GENSPARK_TOKEN not set, music generation returns mock audio");
    }

    expose_internal_details(config.app_env.is_development());

    let state = AppState {
        db,
        redis,
        keys: JwtKeys::new(config.jwt_secret, config.jwt_refresh_secret),
        weather: OpenWeatherClient {
            client: weather_http,
            base_url: config.openweather_base_url,
            api_key: config.openweather_api_key,
        },
        music: MusicClient {
            client: music_http,
            api_url: config.genspark_api_url,
            token: config.genspark_token,
            app_env: config.app_env,
        },
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(app_env = ?config.app_env, "api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
