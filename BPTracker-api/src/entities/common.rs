use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use bp_tracker_domain::services::BloodPressureServiceError;

/// Error response format for API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
        }
    }

    /// Create a storage unavailable error response
    pub fn service_unavailable() -> Self {
        Self {
            error: "service_unavailable".to_string(),
            message: "Reading storage is temporarily unavailable".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "validation_error" | "bad_request" => StatusCode::BAD_REQUEST,
            "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BloodPressureServiceError> for ErrorResponse {
    fn from(err: BloodPressureServiceError) -> Self {
        if let BloodPressureServiceError::Validation(message) = &err {
            warn!("Invalid reading: {}", message);
            return ErrorResponse::validation_error(message);
        }

        if err.is_invalid_input() {
            warn!("Bad request: {}", err);
            ErrorResponse::bad_request(&err.to_string())
        } else {
            error!("Storage failure: {}", err);
            ErrorResponse::service_unavailable()
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
