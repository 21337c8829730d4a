//! JSON body and query extractors that run `validator` rules.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use axum::http::request::Parts;
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use worktunes_core::error::FieldError;

use crate::error::ApiError;

/// `Json<T>` followed by `T::validate()`. Both malformed bodies and rule
/// failures become `ApiError::Validation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// `Query<T>` followed by `T::validate()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

/// `Path<T>` whose rejection renders as the JSON error envelope.
pub type ApiPath<T> = WithRejection<Path<T>, ApiError>;

/// Char count of `value` with surrounding whitespace removed, checked
/// against `min..=max`. Names are stored trimmed, so they are measured trimmed.
pub fn trimmed_length(
    value: &str,
    min: usize,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new("length").with_message(message.into()))
    }
}

/// `range` lets NaN through, so coordinates are checked for finiteness first.
pub fn finite_coordinate(value: impl std::borrow::Borrow<f64>) -> Result<(), ValidationError> {
    if value.borrow().is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite").with_message("Coordinates must be finite numbers".into()))
    }
}

/// Flatten validator output into `{field, message}` pairs, sorted by field.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(field_errors(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(vec![FieldError::new("path", rejection.body_text())])
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
