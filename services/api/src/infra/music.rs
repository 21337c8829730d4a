use anyhow::Context as _;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppEnv;
use crate::domain::repository::MusicGenerator;
use crate::domain::types::{GeneratedAudio, GenerationRequest};
use crate::error::ApiError;

const MOCK_AUDIO_BASE_URL: &str = "https://worktunesai-demo.s3.amazonaws.com";

const AUDIO_REQUIREMENTS: &str = "High-quality stereo audio (44.1kHz, 16-bit minimum). \
    Seamless looping capability for continuous playback. \
    Balanced frequency response optimized for speakers and headphones. \
    Consistent volume levels without sudden changes. \
    Professional mastering suitable for work environments. \
    No abrupt starts or endings";

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    query: &'a str,
    duration: u32,
    task_summary: &'a str,
    file_name: &'a str,
    requirements: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    generated_audios: Vec<AudioEntry>,
}

#[derive(Debug, Deserialize)]
struct AudioEntry {
    audio_url: String,
    duration: Option<u32>,
}

/// Audio generation API client.
///
/// Without a token every request is answered with mock audio. In development
/// upstream failures also fall back to mock audio.
#[derive(Clone)]
pub struct MusicClient {
    pub client: Client,
    pub api_url: String,
    pub token: Option<String>,
    pub app_env: AppEnv,
}

impl MusicClient {
    async fn call(&self, token: &str, request: &GenerationRequest) -> anyhow::Result<GeneratedAudio> {
        let url = format!("{}/audio/generate", self.api_url.trim_end_matches('/'));
        let body = GenerateBody {
            model: &request.model,
            query: &request.prompt,
            duration: request.duration_seconds,
            task_summary: &request.task_summary,
            file_name: &request.file_name,
            requirements: AUDIO_REQUIREMENTS,
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("music API error: {status} - {text}"));
        }

        let result: GenerateResponse = response.json().await.context("decode music response")?;
        let audio = result
            .generated_audios
            .into_iter()
            .next()
            .context("music API returned no audio")?;
        Ok(GeneratedAudio {
            audio_url: audio.audio_url,
            duration_seconds: audio.duration.unwrap_or(request.duration_seconds),
            model: request.model.clone(),
            is_mock: false,
        })
    }
}

/// Deterministic stand-in for a generated track.
pub fn mock_audio(request: &GenerationRequest) -> GeneratedAudio {
    GeneratedAudio {
        audio_url: format!(
            "{MOCK_AUDIO_BASE_URL}/mock_{}_{}.mp3",
            request.model.replace('/', "_"),
            Utc::now().timestamp_millis()
        ),
        duration_seconds: request.duration_seconds,
        model: request.model.clone(),
        is_mock: true,
    }
}

impl MusicGenerator for MusicClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAudio, ApiError> {
        let Some(token) = self.token.as_deref() else {
            tracing::warn!(model = %request.model, "GENSPARK_TOKEN not set, serving mock audio");
            return Ok(mock_audio(request));
        };

        match self.call(token, request).await {
            Ok(audio) => {
                tracing::info!(model = %request.model, audio_url = %audio.audio_url, "audio generated");
                Ok(audio)
            }
            Err(e) if self.app_env.is_development() => {
                tracing::warn!(error = %format!("{e:#}"), "music API failed, falling back to mock audio");
                Ok(mock_audio(request))
            }
            Err(e) => Err(ApiError::GenerationFailed(e)),
        }
    }
}
