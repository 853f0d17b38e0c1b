use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// `{"success": bool, "data": ...}` envelope for the service endpoints.
///
/// Story routes answer with bare bodies instead; see `handlers::stories`.
#[derive(Debug)]
pub struct Envelope<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self { data, status_code: StatusCode::OK }
    }

    /// Degraded answer: `success` is false but `data` is still reported
    pub fn degraded(data: T) -> Self {
        Self { data, status_code: StatusCode::SERVICE_UNAVAILABLE }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = json!({
            "success": self.status_code.is_success(),
            "data": data_value
        });

        (self.status_code, Json(envelope)).into_response()
    }
}
