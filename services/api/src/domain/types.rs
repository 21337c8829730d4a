use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worktunes_domain::activity::ActivityType;
use worktunes_domain::environment::{TimeOfDay, WeatherCondition};
use worktunes_domain::music::{MusicParameters, WorkType};

/// Weather reports are cached for 5 minutes.
pub const WEATHER_CACHE_TTL_SECS: u64 = 300;
/// Generated audio is reused for 24 hours per (time, weather, work type).
pub const BGM_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

pub const DEFAULT_DURATION_SECS: u32 = 180;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub location: String,
    pub timezone: String,
    pub preferred_work_type: Option<WorkType>,
    pub favorite_genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Profile created alongside a new account.
    pub fn new_default(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location: "Unknown".to_owned(),
            timezone: "UTC".to_owned(),
            preferred_work_type: None,
            favorite_genres: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial profile update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub location: Option<String>,
    pub timezone: Option<String>,
    pub preferred_work_type: Option<WorkType>,
    pub favorite_genres: Option<Vec<String>>,
}

/// A generated track and the context it was generated for.
#[derive(Debug, Clone)]
pub struct GeneratedBgm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub audio_url: String,
    pub prompt: String,
    pub duration_seconds: u32,
    pub time_of_day: TimeOfDay,
    pub weather_condition: WeatherCondition,
    pub work_type: WorkType,
    pub mood: String,
    pub bpm: u16,
    pub musical_key: String,
    pub genre: String,
    pub model: String,
    pub parameters: MusicParameters,
    pub is_mock: bool,
    pub play_count: u32,
    pub user_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bgm_id: Uuid,
    pub activity_type: ActivityType,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(user_id: Uuid, bgm_id: Uuid, activity_type: ActivityType) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            bgm_id,
            activity_type,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTrack {
    pub id: Uuid,
    pub playlist_id: Uuid,
    pub bgm_id: Uuid,
    /// 0-based slot; new tracks go to `max + 1`.
    pub position: u32,
    pub added_at: DateTime<Utc>,
}

/// Where to look the weather up.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherLookup {
    Coords { lat: f64, lon: f64 },
    City(String),
}

impl WeatherLookup {
    /// Coordinates win over a city name when both are given.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>, city: Option<&str>) -> Option<Self> {
        match (lat, lon, city.map(str::trim)) {
            (Some(lat), Some(lon), _) => Some(Self::Coords { lat, lon }),
            (_, _, Some(city)) if !city.is_empty() => Some(Self::City(city.to_owned())),
            _ => None,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Self::Coords { lat, lon } => format!("weather:{lat}:{lon}"),
            Self::City(city) => format!("weather:city:{city}"),
        }
    }
}

/// Current conditions, normalized from the upstream provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: String,
    /// Rounded °C.
    pub temperature: i32,
    pub condition: WeatherCondition,
    pub condition_code: i64,
    pub description: String,
    pub humidity: u32,
    pub wind_speed: f64,
    pub timestamp: DateTime<Utc>,
}

/// Audio produced by the music generator (or its mock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAudio {
    pub audio_url: String,
    pub duration_seconds: u32,
    pub model: String,
    pub is_mock: bool,
}

/// What the music generator is asked to produce.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub duration_seconds: u32,
    pub task_summary: String,
    pub file_name: String,
}

pub fn bgm_cache_key(time: TimeOfDay, weather: WeatherCondition, work: WorkType) -> String {
    format!("bgm:{time}:{weather}:{work}")
}

/// Key under which a user's current refresh token is stored.
pub fn refresh_token_key(user_id: Uuid) -> String {
    format!("refresh_token:{user_id}")
}
