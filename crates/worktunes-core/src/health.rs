use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// `GET /healthz`: the process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Outcome of one dependency probe in a readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyCheck {
    pub name: &'static str,
    pub ok: bool,
}

/// Readiness body. 200 when every dependency answered, 503 otherwise.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub checks: Vec<DependencyCheck>,
}

impl Readiness {
    pub fn from_checks(checks: Vec<DependencyCheck>) -> Self {
        Self {
            ready: checks.iter().all(|c| c.ok),
            checks,
        }
    }
}

impl IntoResponse for Readiness {
    fn into_response(self) -> Response {
        let status = if self.ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (status, Json(self)).into_response()
    }
}
