//! Failure half of the JSON envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// One failed field of a validated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// `{success: false, kind, message, errors?, detail?}`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub kind: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "no_field_errors")]
    pub errors: &'a [FieldError],
    /// Underlying cause, only filled in outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn no_field_errors(errors: &&[FieldError]) -> bool {
    errors.is_empty()
}

/// Render an error envelope with the given status.
pub fn error_response(
    status: StatusCode,
    kind: &str,
    message: String,
    errors: &[FieldError],
) -> Response {
    error_response_with_detail(status, kind, message, errors, None)
}

/// Same as [`error_response`], carrying the cause in `detail`.
pub fn error_response_with_detail(
    status: StatusCode,
    kind: &str,
    message: String,
    errors: &[FieldError],
    detail: Option<String>,
) -> Response {
    let body = ErrorBody {
        success: false,
        kind,
        message,
        errors,
        detail,
    };
    (status, Json(body)).into_response()
}
