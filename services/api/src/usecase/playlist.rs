use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{BgmRepository, PlaylistRepository};
use crate::domain::types::{Playlist, PlaylistTrack, PlaylistUpdate};
use crate::error::ApiError;

/// Playlist with its tracks in position order.
#[derive(Debug)]
pub struct PlaylistDetail {
    pub playlist: Playlist,
    pub tracks: Vec<PlaylistTrack>,
}

// ── CreatePlaylist ───────────────────────────────────────────────────────────

pub struct CreatePlaylistInput {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
}

pub struct CreatePlaylistUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> CreatePlaylistUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreatePlaylistInput,
    ) -> Result<Playlist, ApiError> {
        let now = Utc::now();
        let playlist = Playlist {
            id: Uuid::now_v7(),
            user_id,
            name: input.name.trim().to_owned(),
            description: input.description,
            is_public: input.is_public,
            created_at: now,
            updated_at: now,
        };
        self.playlists.create(&playlist).await?;
        Ok(playlist)
    }
}

// ── ListPlaylists ────────────────────────────────────────────────────────────

pub struct ListPlaylistsUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> ListPlaylistsUseCase<P> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Playlist>, ApiError> {
        self.playlists.list(user_id).await
    }
}

// ── GetPlaylist ──────────────────────────────────────────────────────────────

pub struct GetPlaylistUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> GetPlaylistUseCase<P> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<PlaylistDetail, ApiError> {
        let playlist = self
            .playlists
            .find_owned(user_id, id)
            .await?
            .ok_or(ApiError::PlaylistNotFound)?;
        let tracks = self.playlists.tracks(playlist.id).await?;
        Ok(PlaylistDetail { playlist, tracks })
    }
}

// ── UpdatePlaylist ───────────────────────────────────────────────────────────

pub struct UpdatePlaylistUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> UpdatePlaylistUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        mut update: PlaylistUpdate,
    ) -> Result<Playlist, ApiError> {
        update.name = update.name.map(|n| n.trim().to_owned());
        self.playlists
            .update(user_id, id, &update, Utc::now())
            .await?
            .ok_or(ApiError::PlaylistNotFound)
    }
}

// ── DeletePlaylist ───────────────────────────────────────────────────────────

pub struct DeletePlaylistUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> DeletePlaylistUseCase<P> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !self.playlists.delete_owned(user_id, id).await? {
            return Err(ApiError::PlaylistNotFound);
        }
        Ok(())
    }
}

// ── AddTrack ─────────────────────────────────────────────────────────────────

/// Append one of the caller's own tracks to one of the caller's playlists.
pub struct AddTrackUseCase<P: PlaylistRepository, B: BgmRepository> {
    pub playlists: P,
    pub bgms: B,
}

impl<P: PlaylistRepository, B: BgmRepository> AddTrackUseCase<P, B> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        playlist_id: Uuid,
        bgm_id: Uuid,
    ) -> Result<PlaylistTrack, ApiError> {
        self.playlists
            .find_owned(user_id, playlist_id)
            .await?
            .ok_or(ApiError::PlaylistNotFound)?;
        self.bgms
            .find_owned(user_id, bgm_id)
            .await?
            .ok_or(ApiError::BgmNotFound)?;
        self.playlists
            .add_track(playlist_id, bgm_id, Utc::now())
            .await
    }
}

// ── RemoveTrack ──────────────────────────────────────────────────────────────

pub struct RemoveTrackUseCase<P: PlaylistRepository> {
    pub playlists: P,
}

impl<P: PlaylistRepository> RemoveTrackUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        playlist_id: Uuid,
        track_id: Uuid,
    ) -> Result<(), ApiError> {
        self.playlists
            .find_owned(user_id, playlist_id)
            .await?
            .ok_or(ApiError::PlaylistNotFound)?;
        if !self.playlists.remove_track(playlist_id, track_id).await? {
            return Err(ApiError::TrackNotFound);
        }
        Ok(())
    }
}
