//! Error handling for the API server

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use infra_registry::RegistryError;
use serde_json::json;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Registry(ref e) => match e {
                RegistryError::UserNotFound(_)
                | RegistryError::ProjectNotFound(_)
                | RegistryError::TeamNotFound(_)
                | RegistryError::ApplicationNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                RegistryError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                RegistryError::Search(_) => {
                    (StatusCode::BAD_GATEWAY, "Search backend error".to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Registry error".to_string(),
                ),
            },
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "timestamp": timestamp,
        }));

        (status, body).into_response()
    }
}

/// Malformed JSON bodies are reported as validation failures
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Unparseable path segments are validation failures
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Unparseable query strings are validation failures
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

// Convenience functions for common errors
impl ApiError {
    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}
