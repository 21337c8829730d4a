//! JWT access/refresh token issuing and validation.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-token lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Refresh-token lifetime in seconds (7 days). Also the session TTL in Redis.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// HMAC secrets for the two token kinds.
///
/// Access and refresh tokens are signed with different secrets, so one can
/// never be accepted in place of the other.
#[derive(Clone)]
pub struct JwtKeys {
    pub access_secret: String,
    pub refresh_secret: String,
}

impl JwtKeys {
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
        }
    }

    fn secret(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    fn ttl_secs(self) -> u64 {
        match self {
            Self::Access => ACCESS_TOKEN_TTL_SECS,
            Self::Refresh => REFRESH_TOKEN_TTL_SECS,
        }
    }
}

/// JWT claims payload shared by both token kinds.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `sub` | user id (UUID string) |
/// | `email` | user email at issue time |
/// | `iat` / `exp` | seconds since UNIX epoch |
/// | `jti` | random id; keeps two tokens issued in the same second distinct |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub email: String,
    pub iat: u64,
    pub exp: u64,
    pub jti: String,
}

/// Identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub email: String,
    pub exp: u64,
}

/// Freshly issued access + refresh tokens.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Errors returned by token validation.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn issue(
    kind: TokenKind,
    user_id: Uuid,
    email: &str,
    keys: &JwtKeys,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    let iat = now_secs();
    let exp = iat + kind.ttl_secs();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(keys.secret(kind).as_bytes()),
    )?;
    Ok((token, exp))
}

/// Issue an access token and a refresh token for the user.
pub fn issue_token_pair(
    keys: &JwtKeys,
    user_id: Uuid,
    email: &str,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let (access_token, access_token_exp) = issue(TokenKind::Access, user_id, email, keys)?;
    let (refresh_token, _) = issue(TokenKind::Refresh, user_id, email, keys)?;
    Ok(TokenPair {
        access_token,
        access_token_exp,
        refresh_token,
    })
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

fn validate(token: &str, kind: TokenKind, keys: &JwtKeys) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, keys.secret(kind))?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        email: claims.email,
        exp: claims.exp,
    })
}

/// Validate a bearer access token.
pub fn validate_access_token(token: &str, keys: &JwtKeys) -> Result<TokenInfo, AuthError> {
    validate(token, TokenKind::Access, keys)
}

/// Validate a refresh token (signature and expiry only; session matching is the caller's job).
pub fn validate_refresh_token(token: &str, keys: &JwtKeys) -> Result<TokenInfo, AuthError> {
    validate(token, TokenKind::Refresh, keys)
}
