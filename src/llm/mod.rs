//! Generative backend abstraction and the model fallback chain.
//!
//! The service treats text generation as an opaque capability: a call with
//! a model name and a prompt that either yields text, yields empty text, or
//! fails. [`single_word_answer`] walks an ordered candidate list against
//! that capability — strictly sequentially, one in-flight call per request
//! — accepting the first candidate whose reply has any non-whitespace
//! content and truncating it to its first word.

use async_trait::async_trait;
use thiserror::Error;

pub mod gemini;

pub use gemini::GeminiClient;

/// Models tried in order when no override is configured.
pub const FALLBACK_MODELS: [&str; 4] = [
    "gemini-2.0-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-1.5-flash",
];

/// Failure modes of a generation attempt (and of the exhausted chain).
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport or API failure for one candidate; the chain absorbs these
    /// and retries the next model.
    #[error("{0}")]
    Backend(String),

    /// The chain ran out of candidates without a recorded backend error,
    /// i.e. every model answered with empty text.
    #[error("AI service returned empty response.")]
    EmptyResponse,
}

/// Opaque text-generation capability.
///
/// Implementations must not be assumed reliable: any call may succeed with
/// text, succeed with empty text, or fail.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate text for `prompt` against the named model.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, GenerationError>;
}

/// Candidate list for one request: the configured override alone, or the
/// fixed fallback sequence. Rebuilt per call; no state survives a request.
pub fn candidate_models(model_override: Option<&str>) -> Vec<String> {
    match model_override {
        Some(model) => vec![model.to_string()],
        None => FALLBACK_MODELS.iter().map(|m| m.to_string()).collect(),
    }
}

/// Ask `question` through the fallback chain, returning a single word.
///
/// Candidates are scanned in order. A failed call is recorded as the last
/// error and the scan continues; a reply that is empty after trimming falls
/// through exactly the same way. The first reply with content is truncated
/// to its first whitespace-delimited token and returned. On exhaustion the
/// last recorded backend error surfaces, or [`GenerationError::EmptyResponse`]
/// when every candidate answered empty.
pub async fn single_word_answer(
    backend: &dyn GenerativeBackend,
    candidates: &[String],
    question: &str,
) -> Result<String, GenerationError> {
    let prompt = format!("Answer with a single word only. Question: {question}");
    let mut last_error: Option<GenerationError> = None;

    for model in candidates {
        match backend.generate(model, &prompt).await {
            Ok(text) => {
                if let Some(word) = text.split_whitespace().next() {
                    tracing::debug!(%model, "model candidate accepted");
                    return Ok(word.to_string());
                }
                tracing::debug!(%model, "model candidate returned empty text");
            }
            Err(err) => {
                tracing::warn!(%model, error = %err, "model candidate failed");
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or(GenerationError::EmptyResponse))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
