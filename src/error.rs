//! Request-level error taxonomy and status mapping.
//!
//! Five classes, one status code each. Client input errors carry the
//! validator's exact message; AI exhaustion carries the last backend error
//! message and nothing deeper (stack traces and transport detail never
//! reach the wire).

use axum::http::StatusCode;
use thiserror::Error;

use crate::llm::GenerationError;
use crate::operation::ValidationError;

/// Anything a request can fail with, mapped onto the response envelope by
/// the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body, wrong arity, bad value, or unsupported key (400).
    #[error("{0}")]
    BadRequest(String),

    /// Body exceeded the configured size limit (413).
    #[error("Request body too large.")]
    PayloadTooLarge,

    /// `AI` requested but no backend credential is configured (503).
    #[error("AI service not configured.")]
    AiNotConfigured,

    /// Every AI model candidate failed or answered empty (502).
    #[error("{0}")]
    AiUnavailable(String),

    /// No route matched (404).
    #[error("Not found.")]
    NotFound,

    /// Catch-all for failures that should never happen (500).
    #[error("Internal server error.")]
    Internal,
}

impl ApiError {
    /// HTTP status carried by the error envelope.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::AiNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::AiUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::AiUnavailable(err.to_string())
    }
}
