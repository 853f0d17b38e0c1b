use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Fields only the store may set
const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Per-field validation messages keyed by field name
pub type FieldErrors = HashMap<String, String>;

/// A payload schema checked before the request reaches its handler
pub trait Validate {
    /// Schema name used in rejection messages
    const SCHEMA: &'static str;

    fn validate(&self) -> Result<(), FieldErrors>;
}

/// JSON body that has already passed its schema.
///
/// Rejections short-circuit with a 400 before the handler runs, so handlers
/// taking a `Validated<T>` never re-check the payload.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Validated<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        let payload = check_payload::<T>(value).map_err(|e| {
            tracing::warn!("Rejected {} payload: {}", T::SCHEMA, e);
            e
        })?;

        Ok(Validated(payload))
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(rejection.body_text())
    } else {
        ApiError::invalid_json(rejection.body_text())
    }
}

/// Run the schema against a parsed JSON body
pub fn check_payload<T>(value: Value) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let Value::Object(fields) = &value else {
        return Err(ApiError::invalid_json("Request body must be a JSON object"));
    };

    if let Some(field) = SYSTEM_FIELDS.iter().find(|f| fields.contains_key(**f)) {
        return Err(ApiError::bad_request(format!(
            "System field '{}' cannot be set via API",
            field
        )));
    }

    let payload: T = serde_json::from_value(value).map_err(|e| {
        ApiError::validation_error(format!("Payload does not match the {} schema: {}", T::SCHEMA, e), None)
    })?;

    payload.validate().map_err(|field_errors| {
        ApiError::validation_error(
            format!("Payload does not match the {} schema", T::SCHEMA),
            Some(field_errors),
        )
    })?;

    Ok(payload)
}
