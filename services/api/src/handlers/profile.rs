use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use worktunes_auth_types::identity::AuthUser;
use worktunes_core::envelope::ApiResponse;
use worktunes_domain::music::WorkType;

use crate::domain::types::{ProfileUpdate, UserProfile};
use crate::error::ApiError;
use crate::extract::{ValidatedJson, trimmed_length};
use crate::state::AppState;
use crate::usecase::profile::{GetProfileUseCase, UpdateProfileUseCase};

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "location_length"))]
    pub location: Option<String>,
    #[validate(custom(function = "timezone_length"))]
    pub timezone: Option<String>,
    pub preferred_work_type: Option<WorkType>,
    #[validate(length(max = 20, message = "At most 20 favorite genres"))]
    pub favorite_genres: Option<Vec<String>>,
}

fn location_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 1, 100, "Location must be 1-100 characters")
}

fn timezone_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 1, 64, "Timezone must be 1-64 characters")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub location: String,
    pub timezone: String,
    pub preferred_work_type: Option<WorkType>,
    pub favorite_genres: Vec<String>,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            location: p.location,
            timezone: p.timezone,
            preferred_work_type: p.preferred_work_type,
            favorite_genres: p.favorite_genres,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /api/users/me/profile ────────────────────────────────────────────────

pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<ProfileResponse>, ApiError> {
    let uc = GetProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = uc.execute(user.user_id).await?;
    Ok(ApiResponse::ok(profile.into()))
}

// ── PATCH /api/users/me/profile ──────────────────────────────────────────────

pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiResponse<ProfileResponse>, ApiError> {
    let uc = UpdateProfileUseCase {
        profiles: state.profile_repo(),
    };
    let profile = uc
        .execute(
            user.user_id,
            ProfileUpdate {
                location: body.location,
                timezone: body.timezone,
                preferred_work_type: body.preferred_work_type,
                favorite_genres: body.favorite_genres,
            },
        )
        .await?;
    Ok(ApiResponse::ok(profile.into()).with_message("Profile updated successfully"))
}
