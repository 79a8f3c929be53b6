//! Error types for the chat server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use skycast_core::errors::ChatError;
use thiserror::Error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    /// Malformed or incomplete request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The weather provider could not serve a structured lookup
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// The chat turn did not finish within the request timeout
    #[error("Request timed out")]
    Timeout,

    #[error(transparent)]
    Chat(#[from] ChatError),

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServerError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ServerError::Chat(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Chat(_) | ServerError::Config(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text sent to the caller. Server-side faults never leak their details.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::InvalidRequest(msg) => msg.clone(),
            ServerError::Chat(ChatError::ValidationError(msg)) => msg.clone(),
            ServerError::Upstream(_) => "Unable to fetch weather".to_string(),
            ServerError::Timeout => "Request timed out".to_string(),
            ServerError::Chat(_) | ServerError::Config(_) | ServerError::Internal(_) => {
                "Internal error".to_string()
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed with {}: {}", status, self);
        } else {
            log::warn!("Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
