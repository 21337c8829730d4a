use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{AsyncCommands, Script};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::repository::{Cache, SessionStore};
use crate::domain::types::refresh_token_key;
use crate::error::ApiError;

/// KEYS[1] session key; ARGV expected token, new token, TTL seconds.
const ROTATE_REFRESH_SCRIPT: &str = r"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
    return 1
end
return 0
";

/// Redis-backed JSON cache and refresh-token session store.
#[derive(Clone)]
pub struct RedisCache {
    pub pool: Pool,
}

impl RedisCache {
    async fn conn(&self) -> Result<deadpool_redis::Connection, ApiError> {
        self.pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))
    }
}

impl Cache for RedisCache {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        let value = raw
            .map(|s| serde_json::from_str(&s))
            .transpose()
            .context("decode cached value")?;
        Ok(value)
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), ApiError> {
        let json = serde_json::to_string(value).context("encode cached value")?;
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(key, json, ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }
}

impl SessionStore for RedisCache {
    async fn store_refresh(
        &self,
        user_id: Uuid,
        token: &str,
        ttl_secs: u64,
    ) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .set_ex(refresh_token_key(user_id), token, ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }

    async fn rotate_refresh(
        &self,
        user_id: Uuid,
        expected: &str,
        new: &str,
        ttl_secs: u64,
    ) -> Result<bool, ApiError> {
        let mut conn = self.conn().await?;
        let swapped: i64 = Script::new(ROTATE_REFRESH_SCRIPT)
            .key(refresh_token_key(user_id))
            .arg(expected)
            .arg(new)
            .arg(ttl_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(swapped == 1)
    }

    async fn revoke(&self, user_id: Uuid) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;
        let (): () = conn
            .del(refresh_token_key(user_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }
}
