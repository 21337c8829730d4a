use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use worktunes_auth_types::identity::AuthRejection;
use worktunes_core::error::{FieldError, error_response_with_detail};

static EXPOSE_DETAIL: AtomicBool = AtomicBool::new(false);

/// Attach the error chain of 500/502 responses as `detail`. Set once at
/// startup for development.
pub fn expose_internal_details(enabled: bool) {
    EXPOSE_DETAIL.store(enabled, Ordering::Relaxed);
}

/// API error variants. `Display` is the client-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),
    #[error("Either coordinates (lat, lon) or city name is required")]
    LocationRequired,
    #[error("Access token is required")]
    MissingToken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Account is deactivated")]
    AccountDeactivated,
    #[error("User not found")]
    UserNotFound,
    #[error("BGM not found")]
    BgmNotFound,
    #[error("Playlist not found")]
    PlaylistNotFound,
    #[error("Track not found")]
    TrackNotFound,
    #[error("User with this email already exists")]
    EmailTaken,
    #[error("Track already exists in playlist")]
    TrackAlreadyExists,
    #[error("Failed to fetch weather data")]
    WeatherUnavailable(anyhow::Error),
    #[error("Music generation failed")]
    GenerationFailed(anyhow::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::LocationRequired => "LOCATION_REQUIRED",
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::BgmNotFound => "BGM_NOT_FOUND",
            Self::PlaylistNotFound => "PLAYLIST_NOT_FOUND",
            Self::TrackNotFound => "TRACK_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::TrackAlreadyExists => "TRACK_ALREADY_EXISTS",
            Self::WeatherUnavailable(_) => "WEATHER_UNAVAILABLE",
            Self::GenerationFailed(_) => "GENERATION_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::LocationRequired => StatusCode::BAD_REQUEST,
            Self::MissingToken | Self::InvalidCredentials | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidToken | Self::AccountDeactivated => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::BgmNotFound | Self::PlaylistNotFound | Self::TrackNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailTaken | Self::TrackAlreadyExists => StatusCode::CONFLICT,
            Self::WeatherUnavailable(_) | Self::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MissingToken => Self::MissingToken,
            AuthRejection::InvalidToken => Self::InvalidToken,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render(EXPOSE_DETAIL.load(Ordering::Relaxed))
    }
}

impl ApiError {
    fn render(self, expose_detail: bool) -> Response {
        let mut detail = None;
        match &self {
            Self::Internal(e) | Self::WeatherUnavailable(e) | Self::GenerationFailed(e) => {
                if expose_detail {
                    tracing::error!(error = ?e, kind = self.kind(), "request failed");
                    detail = Some(format!("{e:#}"));
                } else {
                    tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "request failed");
                }
            }
            _ => {}
        }
        let errors: &[FieldError] = match &self {
            Self::Validation(errors) => errors.as_slice(),
            _ => &[],
        };
        error_response_with_detail(self.status(), self.kind(), self.to_string(), errors, detail)
    }
}
