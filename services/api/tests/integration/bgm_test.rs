use uuid::Uuid;

use worktunes_api::config::AppEnv;
use worktunes_api::domain::types::WeatherLookup;
use worktunes_api::error::ApiError;
use worktunes_api::infra::music::MusicClient;
use worktunes_api::usecase::bgm::{
    DeleteBgmUseCase, FeedbackInput, FeedbackUseCase, GenerateBgmInput, GenerateBgmUseCase,
    ListHistoryUseCase, PlayBgmUseCase,
};
use worktunes_api::usecase::environment::GetWeatherUseCase;
use worktunes_domain::activity::ActivityType;
use worktunes_domain::environment::{TimeOfDay, WeatherCondition};
use worktunes_domain::music::{MAX_BPM, MIN_BPM, WorkType};
use worktunes_domain::pagination::PageRequest;

use crate::helpers::{MockBgmRepo, MockCache, MockMusic, MockWeather, test_bgm};

type Generate = GenerateBgmUseCase<MockBgmRepo, MockMusic, MockWeather, MockCache>;

fn generate_usecase(weather: MockWeather, music: MockMusic, cache: MockCache) -> Generate {
    GenerateBgmUseCase {
        bgms: MockBgmRepo::empty(),
        music,
        weather: GetWeatherUseCase { weather, cache },
    }
}

fn input(work_type: WorkType) -> GenerateBgmInput {
    GenerateBgmInput {
        time_of_day: Some(TimeOfDay::Morning),
        weather_condition: Some(WeatherCondition::Clear),
        work_type,
        custom_prompt: None,
        duration_seconds: 180,
        location: None,
        current_hour: 14,
    }
}

// ── GenerateBgmUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_generate_and_persist_track_with_generate_activity() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::default(),
    );
    let bgms = usecase.bgms.bgms_handle();
    let activities = usecase.bgms.activities_handle();
    let cache = usecase.weather.cache.entries_handle();
    let user_id = Uuid::now_v7();

    let output = usecase.execute(user_id, input(WorkType::Focus)).await.unwrap();

    assert!(!output.from_cache);
    let bgm = &output.bgm;
    assert_eq!(bgm.user_id, user_id);
    assert_eq!(bgm.time_of_day, TimeOfDay::Morning);
    assert_eq!(bgm.weather_condition, WeatherCondition::Clear);
    assert_eq!(bgm.work_type, WorkType::Focus);
    assert_eq!(bgm.duration_seconds, 180);
    assert_eq!(bgm.play_count, 0);
    assert!((MIN_BPM..=MAX_BPM).contains(&bgm.bpm));
    assert!(bgm.title.ends_with("Morning BGM"), "title: {}", bgm.title);
    assert_eq!(bgm.prompt, bgm.parameters.prompt());
    assert_eq!(bgm.musical_key, bgm.parameters.keys[0]);

    assert_eq!(bgms.lock().unwrap().len(), 1);
    let activities = activities.lock().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].activity_type, ActivityType::Generate);
    assert_eq!(activities[0].bgm_id, bgm.id);
    assert!(cache.lock().unwrap().contains_key("bgm:morning:clear:focus"));
}

#[tokio::test]
async fn should_send_task_summary_and_file_name_to_generator() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::default(),
    );
    let requests = usecase.music.requests_handle();

    usecase
        .execute(Uuid::now_v7(), input(WorkType::Creative))
        .await
        .unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(
        requests[0].task_summary,
        "WorkTunes BGM: creative work during morning with clear weather"
    );
    assert!(requests[0].file_name.starts_with("worktunes_"));
    assert!(requests[0].file_name.ends_with(".mp3"));
    assert_eq!(requests[0].duration_seconds, 180);
}

#[tokio::test]
async fn should_reuse_cached_audio_for_same_context() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::default(),
    );
    let requests = usecase.music.requests_handle();
    let bgms = usecase.bgms.bgms_handle();
    let user_id = Uuid::now_v7();

    let first = usecase.execute(user_id, input(WorkType::Focus)).await.unwrap();
    let second = usecase.execute(user_id, input(WorkType::Focus)).await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.bgm.audio_url, second.bgm.audio_url);
    assert_ne!(first.bgm.id, second.bgm.id);
    assert_eq!(requests.lock().unwrap().len(), 1);
    assert_eq!(bgms.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_bypass_cache_for_custom_prompt() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::default(),
    );
    let requests = usecase.music.requests_handle();
    let cache = usecase.weather.cache.entries_handle();
    let user_id = Uuid::now_v7();

    let custom = || GenerateBgmInput {
        custom_prompt: Some("  lo-fi piano with vinyl crackle  ".to_owned()),
        ..input(WorkType::Focus)
    };
    let first = usecase.execute(user_id, custom()).await.unwrap();
    let second = usecase.execute(user_id, custom()).await.unwrap();

    assert!(!first.from_cache);
    assert!(!second.from_cache);
    assert_eq!(first.bgm.prompt, "lo-fi piano with vinyl crackle");
    assert_eq!(requests.lock().unwrap().len(), 2);
    assert!(cache.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_cache_fallback_audio_after_upstream_failure() {
    let cache = MockCache::default();
    let entries = cache.entries_handle();
    let outage = GenerateBgmUseCase {
        bgms: MockBgmRepo::empty(),
        music: MusicClient {
            client: reqwest::Client::new(),
            // Discard port: connections are refused immediately.
            api_url: "http://127.0.0.1:9".to_owned(),
            token: Some("token".to_owned()),
            app_env: AppEnv::Development,
        },
        weather: GetWeatherUseCase {
            weather: MockWeather::new(WeatherCondition::Clear),
            cache,
        },
    };
    let user_id = Uuid::now_v7();

    let during = outage.execute(user_id, input(WorkType::Focus)).await.unwrap();
    assert!(during.bgm.is_mock);
    assert!(!during.from_cache);
    assert!(entries.lock().unwrap().is_empty());

    let recovered = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache {
            entries: entries.clone(),
            broken: false,
        },
    );
    let after = recovered.execute(user_id, input(WorkType::Focus)).await.unwrap();
    assert!(!after.bgm.is_mock);
    assert!(!after.from_cache);
    assert!(entries.lock().unwrap().contains_key("bgm:morning:clear:focus"));
}

#[tokio::test]
async fn should_look_up_weather_when_location_given() {
    let weather = MockWeather::new(WeatherCondition::Rain);
    let calls = weather.calls_handle();
    let usecase = generate_usecase(weather, MockMusic::new(), MockCache::default());

    let output = usecase
        .execute(
            Uuid::now_v7(),
            GenerateBgmInput {
                weather_condition: None,
                location: Some(WeatherLookup::City("Tokyo".to_owned())),
                ..input(WorkType::Focus)
            },
        )
        .await
        .unwrap();

    assert_eq!(output.bgm.weather_condition, WeatherCondition::Rain);
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_prefer_explicit_weather_over_location() {
    let weather = MockWeather::new(WeatherCondition::Rain);
    let calls = weather.calls_handle();
    let usecase = generate_usecase(weather, MockMusic::new(), MockCache::default());

    let output = usecase
        .execute(
            Uuid::now_v7(),
            GenerateBgmInput {
                weather_condition: Some(WeatherCondition::Snow),
                location: Some(WeatherLookup::City("Sapporo".to_owned())),
                ..input(WorkType::Relaxed)
            },
        )
        .await
        .unwrap();

    assert_eq!(output.bgm.weather_condition, WeatherCondition::Snow);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_fall_back_to_clear_when_weather_lookup_fails() {
    let usecase = generate_usecase(MockWeather::failing(), MockMusic::new(), MockCache::default());

    let output = usecase
        .execute(
            Uuid::now_v7(),
            GenerateBgmInput {
                weather_condition: None,
                location: Some(WeatherLookup::Coords { lat: 35.0, lon: 139.0 }),
                ..input(WorkType::Focus)
            },
        )
        .await
        .unwrap();

    assert_eq!(output.bgm.weather_condition, WeatherCondition::Clear);
}

#[tokio::test]
async fn should_default_to_clear_without_weather_or_location() {
    let weather = MockWeather::new(WeatherCondition::Rain);
    let calls = weather.calls_handle();
    let usecase = generate_usecase(weather, MockMusic::new(), MockCache::default());

    let output = usecase
        .execute(
            Uuid::now_v7(),
            GenerateBgmInput {
                weather_condition: None,
                ..input(WorkType::Focus)
            },
        )
        .await
        .unwrap();

    assert_eq!(output.bgm.weather_condition, WeatherCondition::Clear);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_derive_time_of_day_from_current_hour() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::default(),
    );

    let output = usecase
        .execute(
            Uuid::now_v7(),
            GenerateBgmInput {
                time_of_day: None,
                current_hour: 22,
                ..input(WorkType::Focus)
            },
        )
        .await
        .unwrap();

    assert_eq!(output.bgm.time_of_day, TimeOfDay::Night);
}

#[tokio::test]
async fn should_not_persist_when_generation_fails() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::failing(),
        MockCache::default(),
    );
    let bgms = usecase.bgms.bgms_handle();

    let result = usecase.execute(Uuid::now_v7(), input(WorkType::Focus)).await;

    assert!(
        matches!(result, Err(ApiError::GenerationFailed(_))),
        "expected GenerationFailed, got {result:?}"
    );
    assert!(bgms.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_generate_when_cache_is_unavailable() {
    let usecase = generate_usecase(
        MockWeather::new(WeatherCondition::Clear),
        MockMusic::new(),
        MockCache::broken(),
    );

    let output = usecase
        .execute(Uuid::now_v7(), input(WorkType::Energetic))
        .await
        .unwrap();

    assert!(!output.from_cache);
}

// ── ListHistoryUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_page_history_newest_first_with_total() {
    let user_id = Uuid::now_v7();
    let mut seeded: Vec<_> = (0..5).map(|age| test_bgm(user_id, age * 60)).collect();
    seeded.push(test_bgm(Uuid::now_v7(), 0));
    let newest_second = seeded[1].id;
    let newest_third = seeded[2].id;

    let usecase = ListHistoryUseCase {
        bgms: MockBgmRepo::new(seeded),
    };
    let page = usecase
        .execute(user_id, PageRequest::new(Some(2), Some(1)))
        .await
        .unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.page.limit, 2);
    assert_eq!(page.page.offset, 1);
    let ids: Vec<Uuid> = page.items.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![newest_second, newest_third]);
}

#[tokio::test]
async fn should_clamp_history_limit() {
    let user_id = Uuid::now_v7();
    let usecase = ListHistoryUseCase {
        bgms: MockBgmRepo::new(vec![test_bgm(user_id, 0)]),
    };
    let page = usecase
        .execute(user_id, PageRequest { limit: 1000, offset: 0 })
        .await
        .unwrap();
    assert_eq!(page.page.limit, 100);
    assert_eq!(page.items.len(), 1);
}

// ── PlayBgmUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_increment_play_count_and_record_play() {
    let user_id = Uuid::now_v7();
    let bgm = test_bgm(user_id, 0);
    let repo = MockBgmRepo::new(vec![bgm.clone()]);
    let activities = repo.activities_handle();
    let usecase = PlayBgmUseCase { bgms: repo };

    let played = usecase.execute(user_id, bgm.id).await.unwrap();
    assert_eq!(played.play_count, 1);
    let played = usecase.execute(user_id, bgm.id).await.unwrap();
    assert_eq!(played.play_count, 2);

    let activities = activities.lock().unwrap();
    assert_eq!(activities.len(), 2);
    assert!(activities.iter().all(|a| a.activity_type == ActivityType::Play));
}

#[tokio::test]
async fn should_hide_other_users_track_on_play() {
    let bgm = test_bgm(Uuid::now_v7(), 0);
    let usecase = PlayBgmUseCase {
        bgms: MockBgmRepo::new(vec![bgm.clone()]),
    };

    let result = usecase.execute(Uuid::now_v7(), bgm.id).await;
    assert!(matches!(result, Err(ApiError::BgmNotFound)));
}

// ── FeedbackUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_rating_and_record_like() {
    let user_id = Uuid::now_v7();
    let bgm = test_bgm(user_id, 0);
    let repo = MockBgmRepo::new(vec![bgm.clone()]);
    let bgms = repo.bgms_handle();
    let activities = repo.activities_handle();
    let usecase = FeedbackUseCase { bgms: repo };

    usecase
        .execute(
            user_id,
            bgm.id,
            FeedbackInput {
                rating: Some(4),
                skip_reason: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(bgms.lock().unwrap()[0].user_rating, Some(4));
    assert_eq!(
        activities.lock().unwrap()[0].activity_type,
        ActivityType::Like
    );
}

#[tokio::test]
async fn should_record_skip_when_reason_given() {
    let user_id = Uuid::now_v7();
    let bgm = test_bgm(user_id, 0);
    let repo = MockBgmRepo::new(vec![bgm.clone()]);
    let bgms = repo.bgms_handle();
    let activities = repo.activities_handle();
    let usecase = FeedbackUseCase { bgms: repo };

    usecase
        .execute(
            user_id,
            bgm.id,
            FeedbackInput {
                rating: None,
                skip_reason: Some("too busy".to_owned()),
            },
        )
        .await
        .unwrap();

    assert_eq!(bgms.lock().unwrap()[0].user_rating, None);
    assert_eq!(
        activities.lock().unwrap()[0].activity_type,
        ActivityType::Skip
    );
}

#[tokio::test]
async fn should_reject_feedback_on_foreign_track() {
    let bgm = test_bgm(Uuid::now_v7(), 0);
    let usecase = FeedbackUseCase {
        bgms: MockBgmRepo::new(vec![bgm.clone()]),
    };

    let result = usecase
        .execute(
            Uuid::now_v7(),
            bgm.id,
            FeedbackInput {
                rating: Some(5),
                skip_reason: None,
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::BgmNotFound)));
}

// ── DeleteBgmUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_own_track_once() {
    let user_id = Uuid::now_v7();
    let bgm = test_bgm(user_id, 0);
    let repo = MockBgmRepo::new(vec![bgm.clone()]);
    let bgms = repo.bgms_handle();
    let usecase = DeleteBgmUseCase { bgms: repo };

    usecase.execute(user_id, bgm.id).await.unwrap();
    assert!(bgms.lock().unwrap().is_empty());

    let again = usecase.execute(user_id, bgm.id).await;
    assert!(matches!(again, Err(ApiError::BgmNotFound)));
}
