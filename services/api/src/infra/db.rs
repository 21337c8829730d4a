use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, IntoActiveModel as _, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionError, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use worktunes_api_schema::{
    generated_bgms, playlist_tracks, playlists, user_activities, user_profiles, users,
};
use worktunes_domain::pagination::PageRequest;

use crate::domain::repository::{
    BgmRepository, PlaylistRepository, ProfileRepository, UserRepository,
};
use crate::domain::types::{
    Activity, GeneratedBgm, Playlist, PlaylistTrack, PlaylistUpdate, User, UserProfile,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn internal<E>(err: E, context: &'static str) -> ApiError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ApiError::Internal(anyhow::Error::new(err).context(context))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create_with_profile(
        &self,
        user: &User,
        profile: &UserProfile,
    ) -> Result<(), ApiError> {
        let user = user.clone();
        let profile = profile.clone();
        let result = self
            .db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    insert_user(txn, &user).await?;
                    insert_profile(txn, &profile).await?;
                    Ok(())
                })
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(ApiError::EmailTaken)
            }
            Err(e) => Err(internal(e, "create user with profile")),
        }
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            last_login_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update last login")?;
        Ok(())
    }
}

async fn insert_user(txn: &DatabaseTransaction, user: &User) -> Result<(), DbErr> {
    users::ActiveModel {
        id: Set(user.id),
        email: Set(user.email.clone()),
        username: Set(user.username.clone()),
        password_hash: Set(user.password_hash.clone()),
        is_active: Set(user.is_active),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
        last_login_at: Set(user.last_login_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_profile(txn: &DatabaseTransaction, profile: &UserProfile) -> Result<(), DbErr> {
    profile_to_active_model(profile).insert(txn).await?;
    Ok(())
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        password_hash: model.password_hash,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: DatabaseConnection,
}

impl ProfileRepository for DbProfileRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserProfile>, ApiError> {
        let model = user_profiles::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find profile")?;
        Ok(model.map(profile_from_model))
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), ApiError> {
        user_profiles::Entity::insert(profile_to_active_model(profile))
            .on_conflict(
                OnConflict::column(user_profiles::Column::UserId)
                    .update_columns([
                        user_profiles::Column::Location,
                        user_profiles::Column::Timezone,
                        user_profiles::Column::PreferredWorkType,
                        user_profiles::Column::FavoriteGenres,
                        user_profiles::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("upsert profile")?;
        Ok(())
    }
}

fn profile_to_active_model(profile: &UserProfile) -> user_profiles::ActiveModel {
    user_profiles::ActiveModel {
        user_id: Set(profile.user_id),
        location: Set(profile.location.clone()),
        timezone: Set(profile.timezone.clone()),
        preferred_work_type: Set(profile.preferred_work_type.map(|w| w.as_str().to_owned())),
        favorite_genres: Set(serde_json::Value::from(profile.favorite_genres.clone())),
        created_at: Set(profile.created_at),
        updated_at: Set(profile.updated_at),
    }
}

fn profile_from_model(model: user_profiles::Model) -> UserProfile {
    UserProfile {
        user_id: model.user_id,
        location: model.location,
        timezone: model.timezone,
        preferred_work_type: model.preferred_work_type.and_then(|w| w.parse().ok()),
        favorite_genres: serde_json::from_value(model.favorite_genres).unwrap_or_default(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── BGM repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBgmRepository {
    pub db: DatabaseConnection,
}

impl BgmRepository for DbBgmRepository {
    async fn create_with_activity(
        &self,
        bgm: &GeneratedBgm,
        activity: &Activity,
    ) -> Result<(), ApiError> {
        let model = bgm_to_active_model(bgm)?;
        let activity = activity.clone();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    model.insert(txn).await?;
                    insert_activity(txn, &activity).await?;
                    Ok(())
                })
            })
            .await
            .context("create bgm with activity")?;
        Ok(())
    }

    async fn list(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<GeneratedBgm>, ApiError> {
        let PageRequest { limit, offset } = page.clamped();
        let models = generated_bgms::Entity::find()
            .filter(generated_bgms::Column::UserId.eq(user_id))
            .order_by_desc(generated_bgms::Column::CreatedAt)
            .order_by_desc(generated_bgms::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list bgm history")?;
        let items = models
            .into_iter()
            .map(bgm_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(items)
    }

    async fn count(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let total = generated_bgms::Entity::find()
            .filter(generated_bgms::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count bgm history")?;
        Ok(total)
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<GeneratedBgm>, ApiError> {
        let model = generated_bgms::Entity::find_by_id(id)
            .filter(generated_bgms::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find owned bgm")?;
        Ok(model.map(bgm_from_model).transpose()?)
    }

    async fn record_play(&self, activity: &Activity) -> Result<Option<GeneratedBgm>, ApiError> {
        let activity = activity.clone();
        let updated = self
            .db
            .transaction::<_, Option<generated_bgms::Model>, DbErr>(move |txn| {
                Box::pin(async move {
                    let result = generated_bgms::Entity::update_many()
                        .col_expr(
                            generated_bgms::Column::PlayCount,
                            Expr::col(generated_bgms::Column::PlayCount).add(1),
                        )
                        .filter(generated_bgms::Column::Id.eq(activity.bgm_id))
                        .filter(generated_bgms::Column::UserId.eq(activity.user_id))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(None);
                    }
                    insert_activity(txn, &activity).await?;
                    generated_bgms::Entity::find_by_id(activity.bgm_id)
                        .one(txn)
                        .await
                })
            })
            .await
            .context("record play")?;
        Ok(updated.map(bgm_from_model).transpose()?)
    }

    async fn record_feedback(
        &self,
        rating: Option<u8>,
        activity: &Activity,
    ) -> Result<bool, ApiError> {
        let activity = activity.clone();
        let recorded = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let owned = generated_bgms::Entity::find_by_id(activity.bgm_id)
                        .filter(generated_bgms::Column::UserId.eq(activity.user_id))
                        .one(txn)
                        .await?;
                    if owned.is_none() {
                        return Ok(false);
                    }
                    if let Some(rating) = rating {
                        generated_bgms::Entity::update_many()
                            .col_expr(
                                generated_bgms::Column::UserRating,
                                Expr::value(i16::from(rating)),
                            )
                            .filter(generated_bgms::Column::Id.eq(activity.bgm_id))
                            .exec(txn)
                            .await?;
                    }
                    insert_activity(txn, &activity).await?;
                    Ok(true)
                })
            })
            .await
            .context("record feedback")?;
        Ok(recorded)
    }

    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = generated_bgms::Entity::delete_many()
            .filter(generated_bgms::Column::Id.eq(id))
            .filter(generated_bgms::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete bgm")?;
        Ok(result.rows_affected > 0)
    }
}

async fn insert_activity(txn: &DatabaseTransaction, activity: &Activity) -> Result<(), DbErr> {
    user_activities::ActiveModel {
        id: Set(activity.id),
        user_id: Set(activity.user_id),
        bgm_id: Set(activity.bgm_id),
        activity_type: Set(activity.activity_type.as_str().to_owned()),
        created_at: Set(activity.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn bgm_to_active_model(bgm: &GeneratedBgm) -> anyhow::Result<generated_bgms::ActiveModel> {
    let parameters = serde_json::to_value(&bgm.parameters).context("encode music parameters")?;
    Ok(generated_bgms::ActiveModel {
        id: Set(bgm.id),
        user_id: Set(bgm.user_id),
        title: Set(bgm.title.clone()),
        audio_url: Set(bgm.audio_url.clone()),
        prompt: Set(bgm.prompt.clone()),
        duration_seconds: Set(bgm.duration_seconds as i32),
        time_of_day: Set(bgm.time_of_day.as_str().to_owned()),
        weather_condition: Set(bgm.weather_condition.as_str().to_owned()),
        work_type: Set(bgm.work_type.as_str().to_owned()),
        mood: Set(bgm.mood.clone()),
        bpm: Set(i32::from(bgm.bpm)),
        musical_key: Set(bgm.musical_key.clone()),
        genre: Set(bgm.genre.clone()),
        model: Set(bgm.model.clone()),
        parameters: Set(parameters),
        is_mock: Set(bgm.is_mock),
        play_count: Set(bgm.play_count as i32),
        user_rating: Set(bgm.user_rating.map(i16::from)),
        created_at: Set(bgm.created_at),
    })
}

fn bgm_from_model(model: generated_bgms::Model) -> anyhow::Result<GeneratedBgm> {
    Ok(GeneratedBgm {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        audio_url: model.audio_url,
        prompt: model.prompt,
        duration_seconds: u32::try_from(model.duration_seconds).unwrap_or_default(),
        time_of_day: model.time_of_day.parse().context("stored time_of_day")?,
        weather_condition: model
            .weather_condition
            .parse()
            .context("stored weather_condition")?,
        work_type: model.work_type.parse().context("stored work_type")?,
        mood: model.mood,
        bpm: u16::try_from(model.bpm).unwrap_or_default(),
        musical_key: model.musical_key,
        genre: model.genre,
        model: model.model,
        parameters: serde_json::from_value(model.parameters).context("stored parameters")?,
        is_mock: model.is_mock,
        play_count: u32::try_from(model.play_count).unwrap_or_default(),
        user_rating: model.user_rating.and_then(|r| u8::try_from(r).ok()),
        created_at: model.created_at,
    })
}

// ── Playlist repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPlaylistRepository {
    pub db: DatabaseConnection,
}

impl PlaylistRepository for DbPlaylistRepository {
    async fn create(&self, playlist: &Playlist) -> Result<(), ApiError> {
        playlists::ActiveModel {
            id: Set(playlist.id),
            user_id: Set(playlist.user_id),
            name: Set(playlist.name.clone()),
            description: Set(playlist.description.clone()),
            is_public: Set(playlist.is_public),
            created_at: Set(playlist.created_at),
            updated_at: Set(playlist.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create playlist")?;
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Playlist>, ApiError> {
        let models = playlists::Entity::find()
            .filter(playlists::Column::UserId.eq(user_id))
            .order_by_desc(playlists::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list playlists")?;
        Ok(models.into_iter().map(playlist_from_model).collect())
    }

    async fn find_owned(&self, user_id: Uuid, id: Uuid) -> Result<Option<Playlist>, ApiError> {
        let model = playlists::Entity::find_by_id(id)
            .filter(playlists::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find owned playlist")?;
        Ok(model.map(playlist_from_model))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        update: &PlaylistUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Playlist>, ApiError> {
        let Some(model) = playlists::Entity::find_by_id(id)
            .filter(playlists::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find playlist for update")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(name) = &update.name {
            am.name = Set(name.clone());
        }
        if let Some(description) = &update.description {
            am.description = Set(Some(description.clone()));
        }
        if let Some(is_public) = update.is_public {
            am.is_public = Set(is_public);
        }
        am.updated_at = Set(at);
        let model = am.update(&self.db).await.context("update playlist")?;
        Ok(Some(playlist_from_model(model)))
    }

    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, ApiError> {
        let result = playlists::Entity::delete_many()
            .filter(playlists::Column::Id.eq(id))
            .filter(playlists::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete playlist")?;
        Ok(result.rows_affected > 0)
    }

    async fn tracks(&self, playlist_id: Uuid) -> Result<Vec<PlaylistTrack>, ApiError> {
        let models = playlist_tracks::Entity::find()
            .filter(playlist_tracks::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(playlist_tracks::Column::Position)
            .all(&self.db)
            .await
            .context("list playlist tracks")?;
        Ok(models.into_iter().map(track_from_model).collect())
    }

    async fn add_track(
        &self,
        playlist_id: Uuid,
        bgm_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<PlaylistTrack, ApiError> {
        let result = self
            .db
            .transaction::<_, playlist_tracks::Model, DbErr>(move |txn| {
                Box::pin(async move {
                    let last = playlist_tracks::Entity::find()
                        .filter(playlist_tracks::Column::PlaylistId.eq(playlist_id))
                        .order_by_desc(playlist_tracks::Column::Position)
                        .one(txn)
                        .await?;
                    let position = last.map_or(0, |t| t.position + 1);
                    playlist_tracks::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        playlist_id: Set(playlist_id),
                        bgm_id: Set(bgm_id),
                        position: Set(position),
                        added_at: Set(at),
                    }
                    .insert(txn)
                    .await
                })
            })
            .await;
        match result {
            Ok(model) => Ok(track_from_model(model)),
            Err(TransactionError::Transaction(e)) if is_unique_violation(&e) => {
                Err(ApiError::TrackAlreadyExists)
            }
            Err(e) => Err(internal(e, "add playlist track")),
        }
    }

    async fn remove_track(&self, playlist_id: Uuid, track_id: Uuid) -> Result<bool, ApiError> {
        let result = playlist_tracks::Entity::delete_many()
            .filter(playlist_tracks::Column::Id.eq(track_id))
            .filter(playlist_tracks::Column::PlaylistId.eq(playlist_id))
            .exec(&self.db)
            .await
            .context("remove playlist track")?;
        Ok(result.rows_affected > 0)
    }
}

fn playlist_from_model(model: playlists::Model) -> Playlist {
    Playlist {
        id: model.id,
        user_id: model.user_id,
        name: model.name,
        description: model.description,
        is_public: model.is_public,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn track_from_model(model: playlist_tracks::Model) -> PlaylistTrack {
    PlaylistTrack {
        id: model.id,
        playlist_id: model.playlist_id,
        bgm_id: model.bgm_id,
        position: u32::try_from(model.position).unwrap_or_default(),
        added_at: model.added_at,
    }
}
