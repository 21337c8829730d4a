use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use worktunes_auth_types::identity::OptionalAuthUser;
use worktunes_core::envelope::ApiResponse;
use worktunes_domain::environment::TimeOfDay;
use worktunes_domain::music::MusicParameters;

use crate::domain::types::{WeatherLookup, WeatherReport};
use crate::error::ApiError;
use crate::extract::{ValidatedQuery, finite_coordinate};
use crate::state::AppState;
use crate::usecase::environment::{GetEnvironmentUseCase, current_hour};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LocationQuery {
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

impl LocationQuery {
    fn lookup(&self) -> Result<WeatherLookup, ApiError> {
        WeatherLookup::from_parts(self.lat, self.lon, self.city.as_deref())
            .ok_or(ApiError::LocationRequired)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayInfo {
    pub current: TimeOfDay,
    pub hour: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentResponse {
    pub weather: WeatherReport,
    pub time_of_day: TimeOfDayInfo,
    pub music_parameters: MusicParameters,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayResponse {
    pub time_of_day: TimeOfDay,
    pub hour: u32,
    #[serde(serialize_with = "worktunes_core::serde::to_rfc3339_ms")]
    pub timestamp: DateTime<Utc>,
}

// ── GET /api/environment/weather ─────────────────────────────────────────────

pub async fn get_weather(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<LocationQuery>,
) -> Result<ApiResponse<WeatherReport>, ApiError> {
    let lookup = query.lookup()?;
    let report = state.weather_lookup().execute(&lookup).await?;
    tracing::debug!(
        user_id = ?user.map(|u| u.user_id),
        location = %report.location,
        "weather served"
    );
    Ok(ApiResponse::ok(report))
}

// ── GET /api/environment/current ─────────────────────────────────────────────

pub async fn get_current_environment(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<LocationQuery>,
) -> Result<ApiResponse<EnvironmentResponse>, ApiError> {
    let lookup = query.lookup()?;
    let uc = GetEnvironmentUseCase {
        weather: state.weather_lookup(),
    };
    let snapshot = uc.execute(&lookup, current_hour()).await?;
    tracing::debug!(
        user_id = ?user.map(|u| u.user_id),
        time_of_day = %snapshot.time_of_day,
        condition = %snapshot.weather.condition,
        "environment served"
    );
    Ok(ApiResponse::ok(EnvironmentResponse {
        weather: snapshot.weather,
        time_of_day: TimeOfDayInfo {
            current: snapshot.time_of_day,
            hour: snapshot.hour,
        },
        music_parameters: snapshot.music_parameters,
        timestamp: snapshot.timestamp,
    }))
}

// ── GET /api/environment/time-of-day ─────────────────────────────────────────

pub async fn get_time_of_day() -> ApiResponse<TimeOfDayResponse> {
    let hour = current_hour();
    ApiResponse::ok(TimeOfDayResponse {
        time_of_day: TimeOfDay::from_hour(hour),
        hour,
        timestamp: Utc::now(),
    })
}
