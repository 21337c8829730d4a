use chrono::Utc;
use uuid::Uuid;

use worktunes_auth_types::password::{hash_password, verify_password};
use worktunes_auth_types::token::{
    JwtKeys, REFRESH_TOKEN_TTL_SECS, TokenPair, issue_token_pair, validate_refresh_token,
};

use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::types::{User, UserProfile};
use crate::error::ApiError;

/// Account plus a freshly issued token pair.
#[derive(Debug)]
pub struct AuthOutput {
    pub user: User,
    pub tokens: TokenPair,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issue a token pair and make its refresh token the user's only live session.
async fn start_session<S: SessionStore>(
    sessions: &S,
    keys: &JwtKeys,
    user: &User,
) -> Result<TokenPair, ApiError> {
    let tokens = issue_token_pair(keys, user.id, &user.email)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("issue token pair: {e}")))?;
    sessions
        .store_refresh(user.id, &tokens.refresh_token, REFRESH_TOKEN_TTL_SECS)
        .await?;
    Ok(tokens)
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub username: String,
}

pub struct RegisterUseCase<U: UserRepository, S: SessionStore> {
    pub users: U,
    pub sessions: S,
    pub keys: JwtKeys,
}

impl<U: UserRepository, S: SessionStore> RegisterUseCase<U, S> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthOutput, ApiError> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("hash password: {e}")))?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            email,
            username: input.username.trim().to_owned(),
            password_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        let profile = UserProfile::new_default(user.id, now);
        self.users.create_with_profile(&user, &profile).await?;

        let tokens = start_session(&self.sessions, &self.keys, &user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(AuthOutput { user, tokens })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository, S: SessionStore> {
    pub users: U,
    pub sessions: S,
    pub keys: JwtKeys,
}

impl<U: UserRepository, S: SessionStore> LoginUseCase<U, S> {
    pub async fn execute(&self, input: LoginInput) -> Result<AuthOutput, ApiError> {
        let mut user = self
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !user.is_active {
            return Err(ApiError::AccountDeactivated);
        }

        let matches = verify_password(&input.password, &user.password_hash)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("verify password: {e}")))?;
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.touch_last_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let tokens = start_session(&self.sessions, &self.keys, &user).await?;
        Ok(AuthOutput { user, tokens })
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<U: UserRepository, S: SessionStore> {
    pub users: U,
    pub sessions: S,
    pub keys: JwtKeys,
}

impl<U: UserRepository, S: SessionStore> RefreshUseCase<U, S> {
    /// Exchange the current refresh token for a new pair. The presented token
    /// must match the stored session, and is dead once the new pair is stored.
    pub async fn execute(&self, refresh_token: &str) -> Result<AuthOutput, ApiError> {
        let info = validate_refresh_token(refresh_token, &self.keys)
            .map_err(|_| ApiError::InvalidRefreshToken)?;

        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(ApiError::InvalidRefreshToken)?;

        let tokens = issue_token_pair(&self.keys, user.id, &user.email)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("issue token pair: {e}")))?;
        let rotated = self
            .sessions
            .rotate_refresh(
                user.id,
                refresh_token,
                &tokens.refresh_token,
                REFRESH_TOKEN_TTL_SECS,
            )
            .await?;
        if !rotated {
            tracing::warn!(user_id = %user.id, "stale or replayed refresh token");
            return Err(ApiError::InvalidRefreshToken);
        }
        Ok(AuthOutput { user, tokens })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionStore> {
    pub sessions: S,
}

impl<S: SessionStore> LogoutUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.sessions.revoke(user_id).await
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetMeUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
