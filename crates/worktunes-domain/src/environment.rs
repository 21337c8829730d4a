//! Environment classification: time-of-day bands and weather buckets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a wire value does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Band of the day derived from the local hour.
///
/// | Hours | Band |
/// |-------|------|
/// | 5–8 | `morning` |
/// | 9–11 | `late_morning` |
/// | 12–16 | `afternoon` |
/// | 17–20 | `evening` |
/// | 21–4 | `night` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    LateMorning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        Self::Morning,
        Self::LateMorning,
        Self::Afternoon,
        Self::Evening,
        Self::Night,
    ];

    /// Classify a 24-hour clock hour. Out-of-range hours fall into `Night`.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=8 => Self::Morning,
            9..=11 => Self::LateMorning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::LateMorning => "late_morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }

    /// Human-readable label used in track titles.
    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::LateMorning => "Late Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Morning => "🌅",
            Self::LateMorning => "🌤️",
            Self::Afternoon => "☀️",
            Self::Evening => "🌆",
            Self::Night => "🌙",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "time of day",
                value: s.to_owned(),
            })
    }
}

/// Coarse weather bucket derived from an OpenWeatherMap condition id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Other,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 5] = [
        Self::Clear,
        Self::Clouds,
        Self::Rain,
        Self::Snow,
        Self::Other,
    ];

    /// Map an OpenWeatherMap condition id to a bucket.
    ///
    /// Thunderstorm, drizzle and rain (2xx–5xx) all count as rain; the
    /// atmosphere group (7xx) and unknown ids are `Other`.
    pub fn from_code(code: i64) -> Self {
        match code {
            200..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Other,
            800 => Self::Clear,
            801..=899 => Self::Clouds,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Other => "other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Other => "",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "weather condition",
                value: s.to_owned(),
            })
    }
}
