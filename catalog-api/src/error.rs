//! API errors and their HTTP translation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use catalog::error::CollectionError;

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// The `{model}` path segment names no registered collection.
    #[error("invalid model")]
    UnknownModel(String),

    #[error("route not supported")]
    RouteNotSupported,

    #[error("not authorized")]
    NotAuthorized,

    /// The request body is not parseable JSON.
    #[error("{0}")]
    MalformedBody(String),

    #[error("Fixture error: {0}")]
    Fixtures(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Collection(CollectionError::InvalidObject(_)) => StatusCode::BAD_REQUEST,
            ApiError::Collection(CollectionError::NotFound(_, _)) => StatusCode::NOT_FOUND,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownModel(_) | ApiError::RouteNotSupported => StatusCode::NOT_FOUND,
            ApiError::NotAuthorized => StatusCode::UNAUTHORIZED,
            ApiError::Collection(_) | ApiError::Fixtures(_) | ApiError::Config(_) | ApiError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Collection(CollectionError::InvalidObject(violation)) => {
                tracing::warn!(%violation, "rejected invalid record");
            }
            ApiError::UnknownModel(model) => tracing::warn!(%model, "request for unknown model"),
            _ if status.is_server_error() => tracing::error!(error = %self, "request failed"),
            _ => {}
        }

        match self {
            ApiError::UnknownModel(_) | ApiError::RouteNotSupported => {
                (status, self.to_string()).into_response()
            }
            _ if status.is_server_error() => (
                status,
                Json(json!({ "error": self.to_string(), "text": "Server crashed!" })),
            )
                .into_response(),
            _ => (status, Json(json!({ "error": self.to_string() }))).into_response(),
        }
    }
}
