//! Bearer-token identity extractors.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use worktunes_core::error::error_response;

use crate::token::{JwtKeys, validate_access_token};

/// Authenticated caller, taken from `Authorization: Bearer <access token>`.
///
/// Rejects with 401 when the header is absent and 403 when the token does not
/// validate (bad signature, malformed, expired).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Like [`AuthUser`] but never rejects: missing or invalid tokens yield `None`.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("Access token is required")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl AuthRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        error_response(self.status(), self.kind(), self.to_string(), &[])
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_owned())
}

fn authenticate(token: Option<String>, keys: &JwtKeys) -> Result<AuthUser, AuthRejection> {
    let token = token.ok_or(AuthRejection::MissingToken)?;
    let info = validate_access_token(&token, keys).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        AuthRejection::InvalidToken
    })?;
    Ok(AuthUser {
        user_id: info.user_id,
        email: info.email,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts);
        async move { authenticate(token, &keys) }
    }
}

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts);
        async move { Ok(Self(authenticate(token, &keys).ok())) }
    }
}
