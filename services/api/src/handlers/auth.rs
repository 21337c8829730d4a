use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use worktunes_auth_types::identity::AuthUser;
use worktunes_core::envelope::ApiResponse;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::{ValidatedJson, trimmed_length};
use crate::state::AppState;
use crate::usecase::auth::{
    AuthOutput, GetMeUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase,
    RegisterInput, RegisterUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(custom(function = "username_length"))]
    pub username: String,
}

fn username_length(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 3, 50, "Username must be between 3 and 50 characters")
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms_opt")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub access_token_exp: u64,
}

impl From<AuthOutput> for AuthResponse {
    fn from(output: AuthOutput) -> Self {
        Self {
            user: output.user.into(),
            access_token: output.tokens.access_token,
            refresh_token: output.tokens.refresh_token,
            access_token_exp: output.tokens.access_token_exp,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_exp: u64,
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let uc = RegisterUseCase {
        users: state.user_repo(),
        sessions: state.cache(),
        keys: state.keys.clone(),
    };
    let output = uc
        .execute(RegisterInput {
            email: body.email,
            password: body.password,
            username: body.username,
        })
        .await?;
    Ok(ApiResponse::created(output.into()).with_message("User registered successfully"))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, ApiError> {
    let uc = LoginUseCase {
        users: state.user_repo(),
        sessions: state.cache(),
        keys: state.keys.clone(),
    };
    let output = uc
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    tracing::info!(user_id = %output.user.id, "user logged in");
    Ok(ApiResponse::ok(output.into()).with_message("Login successful"))
}

// ── POST /api/auth/refresh ───────────────────────────────────────────────────

pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<ApiResponse<TokenResponse>, ApiError> {
    let uc = RefreshUseCase {
        users: state.user_repo(),
        sessions: state.cache(),
        keys: state.keys.clone(),
    };
    let output = uc.execute(&body.refresh_token).await?;
    Ok(ApiResponse::ok(TokenResponse {
        access_token: output.tokens.access_token,
        refresh_token: output.tokens.refresh_token,
        access_token_exp: output.tokens.access_token_exp,
    })
    .with_message("Token refreshed successfully"))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<()>, ApiError> {
    let uc = LogoutUseCase {
        sessions: state.cache(),
    };
    uc.execute(user.user_id).await?;
    tracing::info!(user_id = %user.user_id, "user logged out");
    Ok(ApiResponse::message("Logout successful"))
}

// ── GET /api/auth/me ─────────────────────────────────────────────────────────

pub async fn me(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<UserResponse>, ApiError> {
    let uc = GetMeUseCase {
        users: state.user_repo(),
    };
    let user = uc.execute(user.user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}
