use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{ProfileUpdate, UserProfile};
use crate::error::ApiError;

// ── GetProfile ───────────────────────────────────────────────────────────────

/// Accounts created before profiles existed get the default profile.
pub struct GetProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> GetProfileUseCase<P> {
    pub async fn execute(&self, user_id: Uuid) -> Result<UserProfile, ApiError> {
        Ok(self
            .profiles
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new_default(user_id, Utc::now())))
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<P: ProfileRepository> {
    pub profiles: P,
}

impl<P: ProfileRepository> UpdateProfileUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let now = Utc::now();
        let mut profile = self
            .profiles
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new_default(user_id, now));

        if let Some(location) = update.location {
            profile.location = location.trim().to_owned();
        }
        if let Some(timezone) = update.timezone {
            profile.timezone = timezone.trim().to_owned();
        }
        if let Some(work_type) = update.preferred_work_type {
            profile.preferred_work_type = Some(work_type);
        }
        if let Some(genres) = update.favorite_genres {
            profile.favorite_genres = genres;
        }
        profile.updated_at = now;

        self.profiles.save(&profile).await?;
        Ok(profile)
    }
}
