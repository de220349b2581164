//! The fixed response envelope wrapped around every reply.
//!
//! `{ is_success, official_email, data? | error? }` — exactly one of
//! `data`/`error` is present, chosen by `is_success`. The health probe is
//! the one success without `data`. The email rides on every response,
//! malformed requests included.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

/// The wire shape of every response body.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    /// Success envelope carrying a result.
    pub fn data(email: &str, data: Value) -> Self {
        Self {
            is_success: true,
            official_email: email.to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Success envelope with no payload (the health probe).
    pub fn healthy(email: &str) -> Self {
        Self {
            is_success: true,
            official_email: email.to_string(),
            data: None,
            error: None,
        }
    }

    /// Error envelope carrying a human-readable message.
    pub fn error(email: &str, message: String) -> Self {
        Self {
            is_success: false,
            official_email: email.to_string(),
            data: None,
            error: Some(message),
        }
    }
}

/// 200 response wrapping `data`.
pub fn success(email: &str, data: Value) -> Response {
    (StatusCode::OK, Json(Envelope::data(email, data))).into_response()
}

/// Error response with the status and message from `err`.
pub fn failure(email: &str, err: &ApiError) -> Response {
    (err.status(), Json(Envelope::error(email, err.to_string()))).into_response()
}
