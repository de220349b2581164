//! bfhl-service HTTP server binary.
//!
//! Loads configuration from the environment, constructs the Gemini client
//! once at startup when a credential is present, and serves the router.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 3000)
//! - `OFFICIAL_EMAIL` — email stamped on every response envelope
//! - `GEMINI_API_KEY` — Gemini credential; unset disables the `AI` operation
//! - `GEMINI_MODEL` — optional single-model override for the fallback list
//! - `RUST_LOG` — tracing filter (default: "info")

use std::sync::Arc;

use bfhl_service::llm::GeminiClient;
use bfhl_service::server::{app_router, AppState};
use bfhl_service::{GenerativeBackend, ServiceConfig};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bfhl_service=debug".into()),
        )
        .init();

    let config = ServiceConfig::from_env();

    // The AI capability is constructed exactly once, gated on the
    // credential. Handlers only ever see the Option.
    let ai: Option<Arc<dyn GenerativeBackend>> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Some(Arc::new(GeminiClient::new(key)?)),
        _ => {
            tracing::warn!("GEMINI_API_KEY not set; the AI operation will answer 503");
            None
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let app = app_router(AppState::new(config, ai)).layer(TraceLayer::new_for_http());

    tracing::info!(version = bfhl_service::VERSION, "bfhl-service starting on {bind_addr}");
    tracing::info!("  GET  /health — liveness probe");
    tracing::info!("  POST /bfhl   — computation endpoint");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
