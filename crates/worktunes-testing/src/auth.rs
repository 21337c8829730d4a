//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real access token with fixed test secrets, so requests
//! pass through the same bearer-token extractor as production traffic.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;
use worktunes_auth_types::token::{JwtKeys, issue_token_pair};

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

/// Keys matching the tokens produced by [`MockAuth`].
pub fn keys() -> JwtKeys {
    JwtKeys::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET)
}

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub email: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    /// Signed access token for this identity.
    pub fn access_token(&self) -> String {
        issue_token_pair(&keys(), self.user_id, &self.email)
            .unwrap()
            .access_token
    }

    /// `Authorization: Bearer <token>` header value.
    pub fn bearer(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.access_token())).unwrap()
    }

    /// Headers carrying the bearer token.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::AUTHORIZATION, self.bearer());
        map
    }
}
