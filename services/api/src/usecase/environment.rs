use chrono::{DateTime, Local, Timelike as _, Utc};

use worktunes_domain::environment::TimeOfDay;
use worktunes_domain::music::{MusicParameters, music_parameters};

use crate::domain::repository::{Cache, WeatherPort};
use crate::domain::types::{WEATHER_CACHE_TTL_SECS, WeatherLookup, WeatherReport};
use crate::error::ApiError;

/// Server-local hour, used whenever a request does not pin the time of day.
pub fn current_hour() -> u32 {
    Local::now().hour()
}

// ── GetWeather ───────────────────────────────────────────────────────────────

/// Cache-aside weather lookup. Cache failures are logged and treated as misses.
pub struct GetWeatherUseCase<W: WeatherPort, C: Cache> {
    pub weather: W,
    pub cache: C,
}

impl<W: WeatherPort, C: Cache> GetWeatherUseCase<W, C> {
    pub async fn execute(&self, lookup: &WeatherLookup) -> Result<WeatherReport, ApiError> {
        let key = lookup.cache_key();
        match self.cache.get_json::<WeatherReport>(&key).await {
            Ok(Some(report)) => {
                tracing::debug!(key = %key, "weather cache hit");
                return Ok(report);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %key, error = %e, "weather cache read failed"),
        }

        let report = self.weather.current(lookup).await?;

        if let Err(e) = self
            .cache
            .set_json(&key, &report, WEATHER_CACHE_TTL_SECS)
            .await
        {
            tracing::warn!(key = %key, error = %e, "weather cache write failed");
        }
        Ok(report)
    }
}

// ── GetEnvironment ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EnvironmentSnapshot {
    pub weather: WeatherReport,
    pub time_of_day: TimeOfDay,
    pub hour: u32,
    pub music_parameters: MusicParameters,
    pub timestamp: DateTime<Utc>,
}

/// Weather plus time band plus the music parameters they map to.
pub struct GetEnvironmentUseCase<W: WeatherPort, C: Cache> {
    pub weather: GetWeatherUseCase<W, C>,
}

impl<W: WeatherPort, C: Cache> GetEnvironmentUseCase<W, C> {
    pub async fn execute(
        &self,
        lookup: &WeatherLookup,
        hour: u32,
    ) -> Result<EnvironmentSnapshot, ApiError> {
        let weather = self.weather.execute(lookup).await?;
        let time_of_day = TimeOfDay::from_hour(hour);
        let music_parameters = music_parameters(time_of_day, weather.condition);
        Ok(EnvironmentSnapshot {
            weather,
            time_of_day,
            hour,
            music_parameters,
            timestamp: Utc::now(),
        })
    }
}
