use chrono::Utc;
use uuid::Uuid;

use worktunes_domain::activity::ActivityType;
use worktunes_domain::environment::{TimeOfDay, WeatherCondition};
use worktunes_domain::music::{
    WorkType, contextual_bpm, contextual_title, genre_for_model, music_parameters, select_model,
};
use worktunes_domain::pagination::PageRequest;

use crate::domain::repository::{BgmRepository, Cache, MusicGenerator, WeatherPort};
use crate::domain::types::{
    Activity, BGM_CACHE_TTL_SECS, GeneratedAudio, GeneratedBgm, GenerationRequest, WeatherLookup,
    bgm_cache_key,
};
use crate::error::ApiError;
use crate::usecase::environment::GetWeatherUseCase;

// ── GenerateBgm ──────────────────────────────────────────────────────────────

pub struct GenerateBgmInput {
    pub time_of_day: Option<TimeOfDay>,
    pub weather_condition: Option<WeatherCondition>,
    pub work_type: WorkType,
    pub custom_prompt: Option<String>,
    pub duration_seconds: u32,
    pub location: Option<WeatherLookup>,
    /// Server-local hour used when `time_of_day` is not given.
    pub current_hour: u32,
}

#[derive(Debug)]
pub struct GenerateBgmOutput {
    pub bgm: GeneratedBgm,
    /// The audio was reused from the (time, weather, work type) cache.
    pub from_cache: bool,
}

pub struct GenerateBgmUseCase<B: BgmRepository, M: MusicGenerator, W: WeatherPort, C: Cache> {
    pub bgms: B,
    pub music: M,
    pub weather: GetWeatherUseCase<W, C>,
}

impl<B, M, W, C> GenerateBgmUseCase<B, M, W, C>
where
    B: BgmRepository,
    M: MusicGenerator,
    W: WeatherPort,
    C: Cache,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: GenerateBgmInput,
    ) -> Result<GenerateBgmOutput, ApiError> {
        let time = input
            .time_of_day
            .unwrap_or_else(|| TimeOfDay::from_hour(input.current_hour));
        let weather = self
            .resolve_weather(input.weather_condition, input.location.as_ref())
            .await;
        let work = input.work_type;

        let parameters = music_parameters(time, weather);
        let custom_prompt = input
            .custom_prompt
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty());
        let prompt = custom_prompt
            .clone()
            .unwrap_or_else(|| parameters.prompt());
        let model = select_model(work, weather);

        let request = GenerationRequest {
            model: model.to_owned(),
            prompt: prompt.clone(),
            duration_seconds: input.duration_seconds,
            task_summary: format!("WorkTunes BGM: {work} work during {time} with {weather} weather"),
            file_name: format!("worktunes_{}.mp3", Utc::now().timestamp_millis()),
        };

        // Custom prompts are one-off; only the context-derived audio is shared.
        let cache_key = custom_prompt
            .is_none()
            .then(|| bgm_cache_key(time, weather, work));
        let (audio, from_cache) = self.obtain_audio(cache_key.as_deref(), &request).await?;

        let bgm = GeneratedBgm {
            id: Uuid::now_v7(),
            user_id,
            title: contextual_title(work, time, weather),
            audio_url: audio.audio_url,
            prompt,
            duration_seconds: audio.duration_seconds,
            time_of_day: time,
            weather_condition: weather,
            work_type: work,
            mood: parameters.mood.clone(),
            bpm: contextual_bpm(work, time, weather),
            musical_key: parameters.primary_key().to_owned(),
            genre: genre_for_model(&audio.model).to_owned(),
            model: audio.model,
            parameters,
            is_mock: audio.is_mock,
            play_count: 0,
            user_rating: None,
            created_at: Utc::now(),
        };
        let activity = Activity::new(user_id, bgm.id, ActivityType::Generate);
        self.bgms.create_with_activity(&bgm, &activity).await?;

        tracing::info!(
            user_id = %user_id,
            bgm_id = %bgm.id,
            model = %bgm.model,
            from_cache,
            "bgm generated"
        );
        Ok(GenerateBgmOutput { bgm, from_cache })
    }

    /// Explicit weather wins; otherwise look it up when a location is given.
    /// Lookup failures degrade to clear skies.
    async fn resolve_weather(
        &self,
        explicit: Option<WeatherCondition>,
        location: Option<&WeatherLookup>,
    ) -> WeatherCondition {
        if let Some(weather) = explicit {
            return weather;
        }
        let Some(lookup) = location else {
            return WeatherCondition::Clear;
        };
        match self.weather.execute(lookup).await {
            Ok(report) => report.condition,
            Err(e) => {
                tracing::warn!(error = %e, "weather lookup failed, assuming clear");
                WeatherCondition::Clear
            }
        }
    }

    async fn obtain_audio(
        &self,
        cache_key: Option<&str>,
        request: &GenerationRequest,
    ) -> Result<(GeneratedAudio, bool), ApiError> {
        let cache = &self.weather.cache;
        if let Some(key) = cache_key {
            match cache.get_json::<GeneratedAudio>(key).await {
                Ok(Some(audio)) => return Ok((audio, true)),
                Ok(None) => {}
                Err(e) => tracing::warn!(key, error = %e, "bgm cache read failed"),
            }
        }

        let audio = self.music.generate(request).await?;

        // Mock audio stands in for a missing token or a failed upstream call.
        if audio.is_mock {
            return Ok((audio, false));
        }
        if let Some(key) = cache_key {
            if let Err(e) = cache.set_json(key, &audio, BGM_CACHE_TTL_SECS).await {
                tracing::warn!(key, error = %e, "bgm cache write failed");
            }
        }
        Ok((audio, false))
    }
}

// ── ListHistory ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct HistoryPage {
    pub items: Vec<GeneratedBgm>,
    pub page: PageRequest,
    pub total: u64,
}

pub struct ListHistoryUseCase<B: BgmRepository> {
    pub bgms: B,
}

impl<B: BgmRepository> ListHistoryUseCase<B> {
    pub async fn execute(&self, user_id: Uuid, page: PageRequest) -> Result<HistoryPage, ApiError> {
        let page = page.clamped();
        let items = self.bgms.list(user_id, page).await?;
        let total = self.bgms.count(user_id).await?;
        Ok(HistoryPage { items, page, total })
    }
}

// ── PlayBgm ──────────────────────────────────────────────────────────────────

/// Fetch an owned track for playback: bumps `play_count` and logs a `play`.
pub struct PlayBgmUseCase<B: BgmRepository> {
    pub bgms: B,
}

impl<B: BgmRepository> PlayBgmUseCase<B> {
    pub async fn execute(&self, user_id: Uuid, bgm_id: Uuid) -> Result<GeneratedBgm, ApiError> {
        let activity = Activity::new(user_id, bgm_id, ActivityType::Play);
        self.bgms
            .record_play(&activity)
            .await?
            .ok_or(ApiError::BgmNotFound)
    }
}

// ── Feedback ─────────────────────────────────────────────────────────────────

pub struct FeedbackInput {
    /// 1–5, validated at the edge.
    pub rating: Option<u8>,
    pub skip_reason: Option<String>,
}

pub struct FeedbackUseCase<B: BgmRepository> {
    pub bgms: B,
}

impl<B: BgmRepository> FeedbackUseCase<B> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        bgm_id: Uuid,
        input: FeedbackInput,
    ) -> Result<(), ApiError> {
        let activity_type = ActivityType::from_feedback(input.skip_reason.as_deref());
        let activity = Activity::new(user_id, bgm_id, activity_type);
        if !self.bgms.record_feedback(input.rating, &activity).await? {
            return Err(ApiError::BgmNotFound);
        }
        Ok(())
    }
}

// ── DeleteBgm ────────────────────────────────────────────────────────────────

pub struct DeleteBgmUseCase<B: BgmRepository> {
    pub bgms: B,
}

impl<B: BgmRepository> DeleteBgmUseCase<B> {
    pub async fn execute(&self, user_id: Uuid, bgm_id: Uuid) -> Result<(), ApiError> {
        if !self.bgms.delete_owned(user_id, bgm_id).await? {
            return Err(ApiError::BgmNotFound);
        }
        Ok(())
    }
}
