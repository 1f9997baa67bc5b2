use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::assistant::AssistantError;
use crate::domain::errors::CensusError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 422 Unprocessable Entity error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Creates a 502 Bad Gateway error
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    /// Creates a 503 Service Unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<CensusError> for ApiError {
    fn from(err: CensusError) -> Self {
        match err {
            CensusError::Validation(message) => Self::bad_request(message),
            CensusError::NotFound(message) => Self::not_found(message),
            CensusError::Conflict(message) => Self::conflict(message),
            CensusError::Unauthorized(message) => Self::unauthorized(message),
            CensusError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                Self::internal_server_error("Database error")
            }
            CensusError::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<AssistantError> for ApiError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::EmptyQuestion => Self::bad_request(err.to_string()),
            AssistantError::Disabled => Self::service_unavailable(err.to_string()),
            AssistantError::Unanswerable | AssistantError::UnsafeQuery(_) => {
                Self::unprocessable(err.to_string())
            }
            AssistantError::Execution(_) => {
                tracing::warn!(error = %err, "Assistant query failed");
                Self::unprocessable("The generated query could not be executed")
            }
            AssistantError::Llm(_) => {
                tracing::error!(error = %err, "Language model request failed");
                Self::bad_gateway("The language model is unavailable")
            }
            AssistantError::Json(_) => {
                tracing::error!(error = %err, "Assistant serialization failed");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}
