//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request payloads and helpers that
//! turn axum extractor rejections into [`AppError`]s, so every malformed
//! request gets the same JSON error body.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use tutorial_core::{NewTutorial, TutorialId, TutorialPatch};

use crate::error::AppError;

/// Trait for request types that can validate their business rules
/// beyond what serde deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

impl Validate for NewTutorial {
    fn validate(&self) -> Result<(), String> {
        NewTutorial::validate(self).map_err(|e| e.to_string())
    }
}

impl Validate for TutorialPatch {
    fn validate(&self) -> Result<(), String> {
        TutorialPatch::validate(self).map_err(|e| e.to_string())
    }
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Extract query parameters, mapping parse errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse a path segment into a [`TutorialId`].
///
/// A malformed id cannot name a stored tutorial, so it is reported as
/// not found rather than as a client error.
pub fn parse_tutorial_id(raw: &str) -> Result<TutorialId, AppError> {
    raw.parse().map_err(|_| AppError::tutorial_not_found(raw))
}
