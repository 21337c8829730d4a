use worktunes_api::domain::types::{WeatherLookup, WeatherReport};
use worktunes_api::error::ApiError;
use worktunes_api::usecase::environment::{GetEnvironmentUseCase, GetWeatherUseCase};
use worktunes_domain::environment::{TimeOfDay, WeatherCondition};
use worktunes_domain::music::music_parameters;

use crate::helpers::{MockCache, MockWeather};

// ── GetWeatherUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cache_weather_under_lookup_key() {
    let weather = MockWeather::new(WeatherCondition::Rain);
    let calls = weather.calls_handle();
    let cache = MockCache::default();
    let entries = cache.entries_handle();
    let usecase = GetWeatherUseCase { weather, cache };
    let lookup = WeatherLookup::Coords { lat: 35.68, lon: 139.76 };

    let first = usecase.execute(&lookup).await.unwrap();
    let second = usecase.execute(&lookup).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.condition, WeatherCondition::Rain);
    assert_eq!(calls.lock().unwrap().len(), 1);
    let entries = entries.lock().unwrap();
    let cached: WeatherReport = serde_json::from_str(&entries["weather:35.68:139.76"]).unwrap();
    assert_eq!(cached.location, "Tokyo");
}

#[tokio::test]
async fn should_key_city_lookups_separately() {
    let weather = MockWeather::new(WeatherCondition::Clouds);
    let calls = weather.calls_handle();
    let cache = MockCache::default();
    let entries = cache.entries_handle();
    let usecase = GetWeatherUseCase { weather, cache };

    usecase
        .execute(&WeatherLookup::City("Osaka".to_owned()))
        .await
        .unwrap();
    usecase
        .execute(&WeatherLookup::City("Kyoto".to_owned()))
        .await
        .unwrap();

    assert_eq!(calls.lock().unwrap().len(), 2);
    let entries = entries.lock().unwrap();
    assert!(entries.contains_key("weather:city:Osaka"));
    assert!(entries.contains_key("weather:city:Kyoto"));
}

#[tokio::test]
async fn should_treat_cache_errors_as_misses() {
    let weather = MockWeather::new(WeatherCondition::Snow);
    let calls = weather.calls_handle();
    let usecase = GetWeatherUseCase {
        weather,
        cache: MockCache::broken(),
    };
    let lookup = WeatherLookup::City("Sapporo".to_owned());

    let report = usecase.execute(&lookup).await.unwrap();
    usecase.execute(&lookup).await.unwrap();

    assert_eq!(report.condition, WeatherCondition::Snow);
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_surface_upstream_failure() {
    let usecase = GetWeatherUseCase {
        weather: MockWeather::failing(),
        cache: MockCache::default(),
    };

    let result = usecase
        .execute(&WeatherLookup::City("Nowhere".to_owned()))
        .await;
    assert!(
        matches!(result, Err(ApiError::WeatherUnavailable(_))),
        "expected WeatherUnavailable, got {result:?}"
    );
}

// ── GetEnvironmentUseCase ────────────────────────────────────────────────────

#[tokio::test]
async fn should_combine_weather_time_and_music_parameters() {
    let usecase = GetEnvironmentUseCase {
        weather: GetWeatherUseCase {
            weather: MockWeather::new(WeatherCondition::Rain),
            cache: MockCache::default(),
        },
    };

    let snapshot = usecase
        .execute(&WeatherLookup::City("Tokyo".to_owned()), 18)
        .await
        .unwrap();

    assert_eq!(snapshot.hour, 18);
    assert_eq!(snapshot.time_of_day, TimeOfDay::Evening);
    assert_eq!(snapshot.weather.condition, WeatherCondition::Rain);
    assert_eq!(
        snapshot.music_parameters,
        music_parameters(TimeOfDay::Evening, WeatherCondition::Rain)
    );
}
