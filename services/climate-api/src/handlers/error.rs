//! Mapping of extraction failures to HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use climate_extract::ExtractionError;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by every handler; renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub ExtractionError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ExtractionError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            debug!(status = status.as_u16(), error = %self.0, "Rejected request");
        }
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}
