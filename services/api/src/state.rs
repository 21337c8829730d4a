use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use worktunes_auth_types::token::JwtKeys;

use crate::infra::cache::RedisCache;
use crate::infra::db::{
    DbBgmRepository, DbPlaylistRepository, DbProfileRepository, DbUserRepository,
};
use crate::infra::music::MusicClient;
use crate::infra::weather::OpenWeatherClient;
use crate::usecase::environment::GetWeatherUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub keys: JwtKeys,
    pub weather: OpenWeatherClient,
    pub music: MusicClient,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn bgm_repo(&self) -> DbBgmRepository {
        DbBgmRepository {
            db: self.db.clone(),
        }
    }

    pub fn playlist_repo(&self) -> DbPlaylistRepository {
        DbPlaylistRepository {
            db: self.db.clone(),
        }
    }

    pub fn cache(&self) -> RedisCache {
        RedisCache {
            pool: self.redis.clone(),
        }
    }

    /// Cached weather lookup over the configured provider.
    pub fn weather_lookup(&self) -> GetWeatherUseCase<OpenWeatherClient, RedisCache> {
        GetWeatherUseCase {
            weather: self.weather.clone(),
            cache: self.cache(),
        }
    }
}
