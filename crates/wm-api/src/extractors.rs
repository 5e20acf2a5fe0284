//! # Request Extraction Helpers
//!
//! Maps JSON deserialization failures to [`AppError::BadRequest`] so every
//! error leaves the API in the same body format, and path identifiers to
//! [`AppError::Validation`].

use axum::extract::rejection::JsonRejection;
use axum::Json;
use wm_core::{ObjectId, SuiAddress};

use crate::error::AppError;

/// Extract a JSON body, mapping deserialization errors to `400`.
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

/// Parse a Sui address path segment.
pub fn parse_address(raw: &str) -> Result<SuiAddress, AppError> {
    Ok(SuiAddress::new(raw)?)
}

/// Parse an object ID path segment.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    Ok(ObjectId::new(raw)?)
}
