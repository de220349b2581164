//! Route handlers and operation dispatch.
//!
//! # Routes
//!
//! - `GET  /health` — `{"is_success": true, "official_email": ...}`
//! - `POST /bfhl`   — one operation key in, one envelope out
//! - fallback       — 404 error envelope for any other path or method
//!
//! The body is taken as raw bytes and parsed here rather than through the
//! `Json` extractor, so malformed bytes produce the service's own
//! "Invalid JSON body." envelope instead of a framework rejection.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::kernels;
use crate::llm::{self, GenerativeBackend};
use crate::operation::Operation;
use crate::server::envelope::{failure, success, Envelope};

/// Request bodies above this are refused outright.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Shared application state: static configuration plus the optional
/// generative backend. Absence of the backend disables only the `AI`
/// operation.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub ai: Option<Arc<dyn GenerativeBackend>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, ai: Option<Arc<dyn GenerativeBackend>>) -> Self {
        Self {
            config: Arc::new(config),
            ai,
        }
    }
}

/// Build the axum router with all routes and request-level middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler).fallback(not_found_handler))
        .route("/bfhl", post(bfhl_handler).fallback(not_found_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

/// GET /health — liveness probe, succeeds regardless of AI configuration.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(Envelope::healthy(&state.config.official_email))
}

/// POST /bfhl — validate, dispatch, wrap.
///
/// Body extraction failures (the size limit above all) are folded into the
/// standard envelope rather than left as the framework's bare rejection.
async fn bfhl_handler(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(bytes) => run_operation(&state, &bytes).await,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::PayloadTooLarge)
        }
        Err(_) => Err(ApiError::Internal),
    };
    match result {
        Ok(data) => success(&state.config.official_email, data),
        Err(err) => {
            tracing::debug!(status = %err.status(), error = %err, "request rejected");
            failure(&state.config.official_email, &err)
        }
    }
}

/// Catch-all: unmatched paths and methods get the standard 404 envelope.
async fn not_found_handler(State(state): State<AppState>) -> Response {
    failure(&state.config.official_email, &ApiError::NotFound)
}

/// Parse the raw body, dispatch the validated operation to its kernel or
/// to the AI fallback chain, and return the `data` payload.
async fn run_operation(state: &AppState, raw: &[u8]) -> Result<Value, ApiError> {
    let body: Value = serde_json::from_slice(raw)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body.".to_string()))?;

    match Operation::parse(&body)? {
        Operation::Fibonacci(n) => {
            let terms = kernels::fibonacci_series(n)
                .iter()
                .map(|term| json_integer(&term.to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(terms))
        }
        Operation::Prime(nums) => {
            // filter, never reject: an array with zero primes yields []
            let primes: Vec<i64> = nums.into_iter().filter(|&n| kernels::is_prime(n)).collect();
            Ok(serde_json::json!(primes))
        }
        Operation::Lcm(nums) => json_integer(&kernels::reduce_lcm(&nums).to_string()),
        Operation::Hcf(nums) => json_integer(&kernels::reduce_hcf(&nums).to_string()),
        Operation::Ai(question) => {
            // capability check comes before any prompt or candidate work
            let backend = state.ai.as_deref().ok_or(ApiError::AiNotConfigured)?;
            let candidates = llm::candidate_models(state.config.model_override.as_deref());
            let answer = llm::single_word_answer(backend, &candidates, &question).await?;
            Ok(Value::String(answer))
        }
    }
}

/// Exact decimal digits to a JSON number. With serde_json's
/// `arbitrary_precision` this holds values far past u64.
fn json_integer(digits: &str) -> Result<Value, ApiError> {
    digits
        .parse::<serde_json::Number>()
        .map(Value::Number)
        .map_err(|_| ApiError::Internal)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::llm::GenerationError;

    struct ScriptedBackend {
        script: Mutex<VecDeque<Result<String, GenerationError>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<String, GenerationError>>) -> Arc<dyn GenerativeBackend> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, GenerationError> {
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Backend("script exhausted".into())))
        }
    }

    fn test_app(ai: Option<Arc<dyn GenerativeBackend>>) -> Router {
        app_router(AppState::new(ServiceConfig::default(), ai))
    }

    async fn post_bfhl(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/bfhl")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn email() -> String {
        ServiceConfig::default().official_email
    }

    #[tokio::test]
    async fn health_returns_bare_success_envelope() {
        let app = test_app(None);
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["is_success"], true);
        assert_eq!(body["official_email"], email());
        assert!(body.get("data").is_none());
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn fibonacci_returns_series() {
        let (status, body) = post_bfhl(test_app(None), r#"{"fibonacci": 10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_success"], true);
        assert_eq!(body["data"], json!([0, 1, 1, 2, 3, 5, 8, 13, 21, 34]));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn fibonacci_zero_returns_empty_series() {
        let (status, body) = post_bfhl(test_app(None), r#"{"fibonacci": 0}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn fibonacci_200_keeps_exact_terms() {
        let (status, body) = post_bfhl(test_app(None), r#"{"fibonacci": 200}"#).await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 200);
        assert_eq!(
            data[199].to_string(),
            "173402521172797813159685037284371942044301"
        );
    }

    #[tokio::test]
    async fn prime_filters_instead_of_rejecting() {
        let (status, body) =
            post_bfhl(test_app(None), r#"{"prime": [1, 2, 3, 4, 5, 6, 7]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([2, 3, 5, 7]));

        // no primes is still a success, with an empty list
        let (status, body) = post_bfhl(test_app(None), r#"{"prime": [4, 6, 8]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn lcm_and_hcf_reduce_left_to_right() {
        let (status, body) = post_bfhl(test_app(None), r#"{"lcm": [12, 18, 24]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(72));

        let (status, body) = post_bfhl(test_app(None), r#"{"hcf": [12, 18, 24]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(6));

        let (_, body) = post_bfhl(test_app(None), r#"{"lcm": [7, 0]}"#).await;
        assert_eq!(body["data"], json!(0));
    }

    #[tokio::test]
    async fn whole_number_floats_are_accepted() {
        let (status, body) = post_bfhl(test_app(None), r#"{"fibonacci": 10.0}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 10);

        let (status, body) = post_bfhl(test_app(None), r#"{"prime": [2.0, 3]}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([2, 3]));
    }

    #[tokio::test]
    async fn oversized_body_gets_enveloped_413() {
        let oversized = format!(r#"{{"AI": "{}"}}"#, "x".repeat(BODY_LIMIT_BYTES + 1));
        let (status, body) = post_bfhl(test_app(None), &oversized).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["is_success"], false);
        assert_eq!(body["error"], "Request body too large.");
        assert_eq!(body["official_email"], email());
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn validation_failures_return_400_envelopes() {
        let cases = [
            ("not json", "Invalid JSON body."),
            ("[1, 2]", "Invalid JSON body."),
            ("{}", "Request must contain exactly one key."),
            (r#"{"a": 1, "b": 2}"#, "Request must contain exactly one key."),
            (r#"{"fibonacci": 201}"#, "fibonacci must be an integer between 0 and 200."),
            (r#"{"prime": []}"#, "prime must be a non-empty integer array."),
            (r#"{"prime": [1, "x"]}"#, "prime must be a non-empty integer array."),
            (r#"{"AI": "   "}"#, "AI must be a non-empty string."),
            (r#"{"factorial": 5}"#, "Unsupported key."),
        ];
        for (input, message) in cases {
            let (status, body) = post_bfhl(test_app(None), input).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "input: {input}");
            assert_eq!(body["is_success"], false);
            assert_eq!(body["error"], message, "input: {input}");
            assert_eq!(body["official_email"], email());
            assert!(body.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn ai_without_backend_is_503() {
        let (status, body) = post_bfhl(test_app(None), r#"{"AI": "capital of France?"}"#).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "AI service not configured.");
        assert_eq!(body["official_email"], email());
    }

    #[tokio::test]
    async fn ai_answer_survives_candidate_failures() {
        let backend = ScriptedBackend::new(vec![
            Err(GenerationError::Backend("model retired".into())),
            Err(GenerationError::Backend("quota exceeded".into())),
            Ok("Paris extra words".to_string()),
        ]);
        let (status, body) =
            post_bfhl(test_app(Some(backend)), r#"{"AI": "capital of France?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "Paris");
    }

    #[tokio::test]
    async fn ai_exhaustion_is_502_with_last_error() {
        let backend = ScriptedBackend::new(vec![
            Err(GenerationError::Backend("first failure".into())),
            Err(GenerationError::Backend("second failure".into())),
            Err(GenerationError::Backend("third failure".into())),
            Err(GenerationError::Backend("final failure".into())),
        ]);
        let (status, body) =
            post_bfhl(test_app(Some(backend)), r#"{"AI": "capital of France?"}"#).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "final failure");
    }

    #[tokio::test]
    async fn ai_all_empty_is_502_with_generic_message() {
        let backend = ScriptedBackend::new(
            (0..4).map(|_| Ok(String::new())).collect(),
        );
        let (status, body) =
            post_bfhl(test_app(Some(backend)), r#"{"AI": "capital of France?"}"#).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "AI service returned empty response.");
    }

    #[tokio::test]
    async fn unmatched_routes_get_404_envelopes() {
        // unknown path
        let request = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .unwrap();
        let response = test_app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Not found.");
        assert_eq!(body["official_email"], email());

        // wrong method on a known path
        let request = Request::builder()
            .method("POST")
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = test_app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
