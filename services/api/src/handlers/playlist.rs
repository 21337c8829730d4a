use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use worktunes_auth_types::identity::AuthUser;
use worktunes_core::envelope::ApiResponse;

use crate::domain::types::{Playlist, PlaylistTrack, PlaylistUpdate};
use crate::error::ApiError;
use crate::extract::{ApiPath, ValidatedJson, trimmed_length};
use crate::state::AppState;
use crate::usecase::playlist::{
    AddTrackUseCase, CreatePlaylistInput, CreatePlaylistUseCase, DeletePlaylistUseCase,
    GetPlaylistUseCase, ListPlaylistsUseCase, PlaylistDetail, RemoveTrackUseCase,
    UpdatePlaylistUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    #[validate(custom(function = "playlist_name_length"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

fn playlist_name_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 1, 100, "Name must be 1-100 characters")
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    #[validate(custom(function = "playlist_name_length"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    pub bgm_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(p: Playlist) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            is_public: p.is_public,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub id: Uuid,
    pub bgm_id: Uuid,
    pub position: u32,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistTrack> for TrackResponse {
    fn from(t: PlaylistTrack) -> Self {
        Self {
            id: t.id,
            bgm_id: t.bgm_id,
            position: t.position,
            added_at: t.added_at,
        }
    }
}

#[derive(Serialize)]
pub struct PlaylistDetailResponse {
    #[serde(flatten)]
    pub playlist: PlaylistResponse,
    pub tracks: Vec<TrackResponse>,
}

impl From<PlaylistDetail> for PlaylistDetailResponse {
    fn from(detail: PlaylistDetail) -> Self {
        Self {
            playlist: detail.playlist.into(),
            tracks: detail.tracks.into_iter().map(TrackResponse::from).collect(),
        }
    }
}

// ── GET /api/playlists ───────────────────────────────────────────────────────

pub async fn list_playlists(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PlaylistResponse>>, ApiError> {
    let uc = ListPlaylistsUseCase {
        playlists: state.playlist_repo(),
    };
    let playlists = uc.execute(user.user_id).await?;
    Ok(ApiResponse::ok(
        playlists.into_iter().map(PlaylistResponse::from).collect(),
    ))
}

// ── POST /api/playlists ──────────────────────────────────────────────────────

pub async fn create_playlist(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistResponse>, ApiError> {
    let uc = CreatePlaylistUseCase {
        playlists: state.playlist_repo(),
    };
    let playlist = uc
        .execute(
            user.user_id,
            CreatePlaylistInput {
                name: body.name,
                description: body.description,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::created(playlist.into()).with_message("Playlist created successfully"))
}

// ── GET /api/playlists/{id} ──────────────────────────────────────────────────

pub async fn get_playlist(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<ApiResponse<PlaylistDetailResponse>, ApiError> {
    let uc = GetPlaylistUseCase {
        playlists: state.playlist_repo(),
    };
    let detail = uc.execute(user.user_id, id).await?;
    Ok(ApiResponse::ok(detail.into()))
}

// ── PATCH /api/playlists/{id} ────────────────────────────────────────────────

pub async fn update_playlist(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdatePlaylistRequest>,
) -> Result<ApiResponse<PlaylistResponse>, ApiError> {
    let uc = UpdatePlaylistUseCase {
        playlists: state.playlist_repo(),
    };
    let playlist = uc
        .execute(
            user.user_id,
            id,
            PlaylistUpdate {
                name: body.name,
                description: body.description,
                is_public: body.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::ok(playlist.into()).with_message("Playlist updated successfully"))
}

// ── DELETE /api/playlists/{id} ───────────────────────────────────────────────

pub async fn delete_playlist(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let uc = DeletePlaylistUseCase {
        playlists: state.playlist_repo(),
    };
    uc.execute(user.user_id, id).await?;
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

// ── POST /api/playlists/{id}/tracks ──────────────────────────────────────────

pub async fn add_track(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<AddTrackRequest>,
) -> Result<ApiResponse<TrackResponse>, ApiError> {
    let uc = AddTrackUseCase {
        playlists: state.playlist_repo(),
        bgms: state.bgm_repo(),
    };
    let track = uc.execute(user.user_id, id, body.bgm_id).await?;
    Ok(ApiResponse::created(track.into()).with_message("Track added successfully"))
}

// ── DELETE /api/playlists/{id}/tracks/{track_id} ─────────────────────────────

pub async fn remove_track(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path((id, track_id)), _): ApiPath<(Uuid, Uuid)>,
) -> Result<ApiResponse<()>, ApiError> {
    let uc = RemoveTrackUseCase {
        playlists: state.playlist_repo(),
    };
    uc.execute(user.user_id, id, track_id).await?;
    Ok(ApiResponse::message("Track removed successfully"))
}
