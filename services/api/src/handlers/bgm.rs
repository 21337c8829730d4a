use axum::extract::{Path, State};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use worktunes_auth_types::identity::AuthUser;
use worktunes_core::envelope::{ApiResponse, Pagination};
use worktunes_domain::environment::{TimeOfDay, WeatherCondition};
use worktunes_domain::music::{MusicParameters, WorkType};
use worktunes_domain::pagination::PageRequest;

use crate::domain::types::{DEFAULT_DURATION_SECS, GeneratedBgm, WeatherLookup};
use crate::error::ApiError;
use crate::extract::{ApiPath, ValidatedJson, ValidatedQuery, finite_coordinate};
use crate::state::AppState;
use crate::usecase::bgm::{
    DeleteBgmUseCase, FeedbackInput, FeedbackUseCase, GenerateBgmInput, GenerateBgmUseCase,
    ListHistoryUseCase, PlayBgmUseCase,
};
use crate::usecase::environment::current_hour;

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBgmRequest {
    pub time_of_day: Option<TimeOfDay>,
    pub weather_condition: Option<WeatherCondition>,
    pub work_type: Option<WorkType>,
    #[validate(length(max = 500, message = "Custom prompt must be at most 500 characters"))]
    pub custom_prompt: Option<String>,
    #[validate(range(min = 30, max = 300, message = "Duration must be between 30 and 300 seconds"))]
    pub duration_seconds: Option<u32>,
    #[validate(
        custom(function = "finite_coordinate"),
        range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90")
    )]
    pub lat: Option<f64>,
    #[validate(
        custom(function = "finite_coordinate"),
        range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180")
    )]
    pub lon: Option<f64>,
    #[validate(length(min = 1, max = 100, message = "City must be 1-100 characters"))]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<u8>,
    #[validate(length(max = 200, message = "Skip reason must be at most 200 characters"))]
    pub skip_reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmResponse {
    pub id: Uuid,
    pub title: String,
    pub audio_url: String,
    pub prompt: String,
    pub duration_seconds: u32,
    pub time_of_day: TimeOfDay,
    pub weather_condition: WeatherCondition,
    pub work_type: WorkType,
    pub mood: String,
    pub bpm: u16,
    pub key: String,
    pub genre: String,
    pub model: String,
    pub parameters: MusicParameters,
    pub is_mock: bool,
    pub play_count: u32,
    pub user_rating: Option<u8>,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<GeneratedBgm> for BgmResponse {
    fn from(bgm: GeneratedBgm) -> Self {
        Self {
            id: bgm.id,
            title: bgm.title,
            audio_url: bgm.audio_url,
            prompt: bgm.prompt,
            duration_seconds: bgm.duration_seconds,
            time_of_day: bgm.time_of_day,
            weather_condition: bgm.weather_condition,
            work_type: bgm.work_type,
            mood: bgm.mood,
            bpm: bgm.bpm,
            key: bgm.musical_key,
            genre: bgm.genre,
            model: bgm.model,
            parameters: bgm.parameters,
            is_mock: bgm.is_mock,
            play_count: bgm.play_count,
            user_rating: bgm.user_rating,
            created_at: bgm.created_at,
        }
    }
}

// ── POST /api/bgm/generate ───────────────────────────────────────────────────

pub async fn generate_bgm(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<GenerateBgmRequest>,
) -> Result<ApiResponse<BgmResponse>, ApiError> {
    let uc = GenerateBgmUseCase {
        bgms: state.bgm_repo(),
        music: state.music.clone(),
        weather: state.weather_lookup(),
    };
    let output = uc
        .execute(
            user.user_id,
            GenerateBgmInput {
                time_of_day: body.time_of_day,
                weather_condition: body.weather_condition,
                work_type: body.work_type.unwrap_or_default(),
                custom_prompt: body.custom_prompt,
                duration_seconds: body.duration_seconds.unwrap_or(DEFAULT_DURATION_SECS),
                location: WeatherLookup::from_parts(body.lat, body.lon, body.city.as_deref()),
                current_hour: current_hour(),
            },
        )
        .await?;
    let message = if output.from_cache {
        "BGM retrieved from cache"
    } else {
        "BGM generated successfully"
    };
    Ok(ApiResponse::created(output.bgm.into()).with_message(message))
}

// ── GET /api/bgm/history ─────────────────────────────────────────────────────

pub async fn list_history(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<HistoryQuery>,
) -> Result<ApiResponse<Vec<BgmResponse>>, ApiError> {
    let uc = ListHistoryUseCase {
        bgms: state.bgm_repo(),
    };
    let page = uc
        .execute(user.user_id, PageRequest::new(query.limit, query.offset))
        .await?;
    let pagination = Pagination {
        limit: page.page.limit,
        offset: page.page.offset,
        total: page.total,
    };
    let items = page.items.into_iter().map(BgmResponse::from).collect();
    Ok(ApiResponse::ok(items).with_pagination(pagination))
}

// ── GET /api/bgm/{id} ────────────────────────────────────────────────────────

pub async fn get_bgm(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<ApiResponse<BgmResponse>, ApiError> {
    let uc = PlayBgmUseCase {
        bgms: state.bgm_repo(),
    };
    let bgm = uc.execute(user.user_id, id).await?;
    Ok(ApiResponse::ok(bgm.into()))
}

// ── POST /api/bgm/{id}/feedback ──────────────────────────────────────────────

pub async fn submit_feedback(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
    ValidatedJson(body): ValidatedJson<FeedbackRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    let uc = FeedbackUseCase {
        bgms: state.bgm_repo(),
    };
    uc.execute(
        user.user_id,
        id,
        FeedbackInput {
            rating: body.rating,
            skip_reason: body.skip_reason,
        },
    )
    .await?;
    Ok(ApiResponse::message("Feedback recorded successfully"))
}

// ── DELETE /api/bgm/{id} ─────────────────────────────────────────────────────

pub async fn delete_bgm(
    user: AuthUser,
    State(state): State<AppState>,
    WithRejection(Path(id), _): ApiPath<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let uc = DeleteBgmUseCase {
        bgms: state.bgm_repo(),
    };
    uc.execute(user.user_id, id).await?;
    Ok(ApiResponse::message("BGM deleted successfully"))
}
