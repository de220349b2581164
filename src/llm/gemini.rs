//! Google Gemini backend over the Generative Language REST API.
//!
//! One HTTP POST per generation attempt; per-model retrying lives in the
//! fallback chain, not here. Authentication is the API-key query parameter.
//! A reply may legitimately carry no text parts (safety block, empty
//! candidate) — that surfaces as `Ok("")` so the chain can treat it as
//! no-answer rather than a failure.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{GenerationError, GenerativeBackend};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Per-call timeout; a hung backend is cut off here rather than blocking
/// the request forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Gemini API client holding the credential and a pooled HTTP client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Build a client for the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.into(),
            http,
        })
    }

    fn endpoint(model: &str) -> String {
        format!("{API_BASE}/{model}:generateContent")
    }
}

/// `generateContent` request body for a single-turn user prompt.
fn request_body(prompt: &str) -> Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
    })
}

/// Pull the concatenated text parts out of a `generateContent` response.
///
/// An explicit API `error` object becomes a backend error; a response with
/// no candidates or no text parts is an empty answer, not an error.
fn extract_text(response: &Value) -> Result<String, GenerationError> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown Gemini API error");
        return Err(GenerationError::Backend(format!(
            "Gemini API error: {message}"
        )));
    }

    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array());

    let text = parts
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    Ok(text)
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError> {
        tracing::debug!(model, "calling Gemini generateContent");

        let response = self
            .http
            .post(Self::endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Backend(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Backend(format!("Gemini response unreadable: {e}")))?;

        if !status.is_success() {
            // the error body usually carries a better message than the status
            return match extract_text(&body) {
                Err(err) => Err(err),
                Ok(_) => Err(GenerationError::Backend(format!(
                    "Gemini API returned status {status}"
                ))),
            };
        }

        extract_text(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_includes_model_name() {
        assert_eq!(
            GeminiClient::endpoint("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn request_body_wraps_prompt_as_user_turn() {
        let body = request_body("Answer with a single word only. Question: why?");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Answer with a single word only. Question: why?"
        );
    }

    #[test]
    fn extract_text_joins_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Par" }, { "text": "is" }] }
            }]
        });
        assert_eq!(extract_text(&response).unwrap(), "Paris");
    }

    #[test]
    fn missing_candidates_is_empty_not_error() {
        assert_eq!(extract_text(&json!({})).unwrap(), "");
        assert_eq!(
            extract_text(&json!({"candidates": []})).unwrap(),
            ""
        );
    }

    #[test]
    fn api_error_object_becomes_backend_error() {
        let response = json!({
            "error": { "code": 429, "message": "Resource has been exhausted" }
        });
        let err = extract_text(&response).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Gemini API error: Resource has been exhausted"
        );
    }
}
