#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use worktunes_domain::pagination::PageRequest;

use crate::domain::types::{
    Activity, GeneratedAudio, GeneratedBgm, GenerationRequest, Playlist, PlaylistTrack,
    PlaylistUpdate, User, UserProfile, WeatherLookup, WeatherReport,
};
use crate::error::ApiError;

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Insert the user and its profile in one transaction.
    /// A duplicate email yields `ApiError::EmailTaken`.
    async fn create_with_profile(&self, user: &User, profile: &UserProfile)
    -> Result<(), ApiError>;

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;
}

/// Repository for user profiles.
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, ApiError>;

    /// Insert or overwrite the profile row.
    async fn save(&self, profile: &UserProfile) -> Result<(), ApiError>;
}

/// Repository for generated tracks and their activity log.
pub trait BgmRepository: Send + Sync {
    /// Insert the track and its `generate` activity atomically.
    async fn create_with_activity(
        &self,
        bgm: &GeneratedBgm,
        activity: &Activity,
    ) -> Result<(), ApiError>;

    /// Own tracks, newest first.
    async fn list(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<GeneratedBgm>, ApiError>;

    async fn count(&self, user_id: Uuid) -> Result<u64, ApiError>;

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<GeneratedBgm>, ApiError>;

    /// Increment `play_count` and append the activity atomically.
    /// Returns the updated track, or `None` when the caller does not own it.
    async fn record_play(&self, activity: &Activity) -> Result<Option<GeneratedBgm>, ApiError>;

    /// Store the rating (when given) and append the activity atomically.
    /// Returns `false` when the caller does not own the track.
    async fn record_feedback(
        &self,
        rating: Option<u8>,
        activity: &Activity,
    ) -> Result<bool, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError>;
}

/// Repository for playlists and their tracks.
pub trait PlaylistRepository: Send + Sync {
    async fn create(&self, playlist: &Playlist) -> Result<(), ApiError>;

    /// Own playlists, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Playlist>, ApiError>;

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<Playlist>, ApiError>;

    /// Returns the updated playlist, or `None` when the caller does not own it.
    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PlaylistUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Playlist>, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError>;

    /// Tracks ordered by position.
    async fn tracks(&self, playlist_id: Uuid) -> Result<Vec<PlaylistTrack>, ApiError>;

    /// Append a track after the current last position.
    /// The same track twice yields `ApiError::TrackAlreadyExists`.
    async fn add_track(
        &self,
        playlist_id: Uuid,
        bgm_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<PlaylistTrack, ApiError>;

    /// Returns `true` if a row was deleted.
    async fn remove_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<bool, ApiError>;
}

/// One live refresh token per user.
pub trait SessionStore: Send + Sync {
    async fn store_refresh(&self, user_id: Uuid, token: &str, ttl_secs: u64)
    -> Result<(), ApiError>;

    /// Replace the session with `new` only if it still holds `expected`.
    /// Check and write are one atomic step, so of two concurrent rotations
    /// with the same token exactly one returns `true`.
    async fn rotate_refresh(
        &self,
        user_id: Uuid,
        expected: &str,
        new: &str,
        ttl_secs: u64,
    ) -> Result<bool, ApiError>;

    async fn revoke(&self, user_id: Uuid) -> Result<(), ApiError>;
}

/// JSON key-value cache with per-entry TTL.
pub trait Cache: Send + Sync {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError>;
    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), ApiError>;
}

/// Current-weather provider.
pub trait WeatherPort: Send + Sync {
    /// Upstream failures yield `ApiError::WeatherUnavailable`.
    async fn current(&self, lookup: &WeatherLookup) -> Result<WeatherReport, ApiError>;
}

/// Audio generation provider.
pub trait MusicGenerator: Send + Sync {
    /// Upstream failures yield `ApiError::GenerationFailed`.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, ApiError>;
}
