use anyhow::Context as _;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use worktunes_domain::environment::WeatherCondition;

use crate::domain::repository::WeatherPort;
use crate::domain::types::{WeatherLookup, WeatherReport};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    name: String,
    main: MainReadings,
    weather: Vec<ConditionEntry>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    id: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// OpenWeatherMap current-weather client. Without an API key it serves a
/// fixed clear-sky report.
#[derive(Clone)]
pub struct OpenWeatherClient {
    pub client: Client,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl OpenWeatherClient {
    fn request_url(&self, api_key: &str, lookup: &WeatherLookup) -> anyhow::Result<Url> {
        let endpoint = format!("{}/data/2.5/weather", self.base_url.trim_end_matches('/'));
        let mut params = match lookup {
            WeatherLookup::Coords { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            WeatherLookup::City(city) => vec![("q", city.clone())],
        };
        params.push(("appid", api_key.to_owned()));
        params.push(("units", "metric".to_owned()));
        params.push(("lang", "ja".to_owned()));
        Url::parse_with_params(&endpoint, &params).context("build weather url")
    }

    async fn fetch(&self, api_key: &str, lookup: &WeatherLookup) -> anyhow::Result<WeatherReport> {
        let url = self.request_url(api_key, lookup)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenWeatherMap error: {status} - {body}"));
        }

        let data: CurrentWeather = response.json().await.context("decode weather response")?;
        report_from_response(data)
    }
}

fn report_from_response(data: CurrentWeather) -> anyhow::Result<WeatherReport> {
    let entry = data
        .weather
        .into_iter()
        .next()
        .context("weather response has no condition")?;
    Ok(WeatherReport {
        location: data.name,
        temperature: data.main.temp.round() as i32,
        condition: WeatherCondition::from_code(entry.id),
        condition_code: entry.id,
        description: entry.description,
        humidity: data.main.humidity,
        wind_speed: data.wind.speed,
        timestamp: Utc::now(),
    })
}

/// Report served when no API key is configured.
pub fn mock_report(lookup: &WeatherLookup) -> WeatherReport {
    let location = match lookup {
        WeatherLookup::City(city) => city.clone(),
        WeatherLookup::Coords { .. } => "Current Location".to_owned(),
    };
    WeatherReport {
        location,
        temperature: 20,
        condition: WeatherCondition::Clear,
        condition_code: 800,
        description: "clear sky".to_owned(),
        humidity: 60,
        wind_speed: 3.5,
        timestamp: Utc::now(),
    }
}

impl WeatherPort for OpenWeatherClient {
    async fn current(&self, lookup: &WeatherLookup) -> Result<WeatherReport, ApiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("OPENWEATHER_API_KEY not set, serving mock weather");
            return Ok(mock_report(lookup));
        };

        let report = self
            .fetch(api_key, lookup)
            .await
            .map_err(ApiError::WeatherUnavailable)?;
        tracing::info!(location = %report.location, condition = %report.condition, "weather fetched");
        Ok(report)
    }
}
