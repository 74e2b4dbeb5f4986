//! Error types for the gateway and the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Failure of the external generation call.
///
/// Every variant carries a human-readable details string; `display_text`
/// renders it the way the page shows it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Missing, invalid or rejected API key
    #[error("{0}")]
    Unauthenticated(String),
    /// Quota or rate limit exhausted (HTTP 429)
    #[error("{0}")]
    RateLimited(String),
    /// The request never got a response
    #[error("{0}")]
    NetworkFailure(String),
    /// The service refused the prompt or image
    #[error("{0}")]
    InvalidInput(String),
    /// Any other failure, including an unreadable response
    #[error("{0}")]
    Unknown(String),
}

impl GatewayError {
    /// Text shown to the user in place of a model answer.
    pub fn display_text(&self) -> String {
        format!("Error: {self}")
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated(_) => "unauthenticated",
            GatewayError::RateLimited(_) => "rate_limited",
            GatewayError::NetworkFailure(_) => "network_failure",
            GatewayError::InvalidInput(_) => "invalid_input",
            GatewayError::Unknown(_) => "unknown",
        }
    }
}

/// Errors returned by HTTP handlers before the gateway is reached.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self, "Request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Multipart error: {err}"))
    }
}
