/// Deployment environment. Controls whether upstream music failures fall back
/// to mock audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    #[default]
    Production,
}

impl AppEnv {
    /// `"development"` (case-insensitive) selects development; anything else is production.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            Self::Development
        } else {
            Self::Production
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_GENSPARK_API_URL: &str = "https://api.genspark.ai";

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for access tokens.
    pub jwt_secret: String,
    /// HMAC secret for refresh tokens.
    pub jwt_refresh_secret: String,
    /// TCP port to listen on (default 3001). Env var: `API_PORT`.
    pub api_port: u16,
    /// Env var: `APP_ENV` (default production).
    pub app_env: AppEnv,
    /// OpenWeatherMap key. Unset means mock weather.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub genspark_api_url: String,
    /// Music API bearer token. Unset means mock audio.
    pub genspark_token: Option<String>,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            jwt_refresh_secret: std::env::var("JWT_REFRESH_SECRET").expect("JWT_REFRESH_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            app_env: optional("APP_ENV")
                .map(|v| AppEnv::parse(&v))
                .unwrap_or_default(),
            openweather_api_key: optional("OPENWEATHER_API_KEY"),
            openweather_base_url: optional("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_owned()),
            genspark_api_url: optional("GENSPARK_API_URL")
                .unwrap_or_else(|| DEFAULT_GENSPARK_API_URL.to_owned()),
            genspark_token: optional("GENSPARK_TOKEN"),
        }
    }
}
