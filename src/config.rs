//! Service configuration loaded from the environment.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 3000)
//! - `OFFICIAL_EMAIL` — contact email stamped on every response envelope
//! - `GEMINI_MODEL` — optional fixed model name; when set it replaces the
//!   built-in fallback candidate list for the `AI` operation
//! - `GEMINI_API_KEY` — Gemini credential; absence disables the `AI`
//!   operation (the rest of the service keeps working)

/// Fallback contact email when `OFFICIAL_EMAIL` is not set.
pub const DEFAULT_OFFICIAL_EMAIL: &str = "official@bfhl.example.com";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Static configuration consumed by the router and the fallback chain.
///
/// Loaded once at startup; request handling only reads it.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Email attached to every response, success or failure.
    pub official_email: String,
    /// Optional single-model override for the AI candidate list.
    pub model_override: Option<String>,
    /// Port the server binary binds to.
    pub port: u16,
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    ///
    /// Missing or unparsable values fall back to defaults; an empty
    /// `GEMINI_MODEL` counts as unset.
    pub fn from_env() -> Self {
        let official_email = std::env::var("OFFICIAL_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OFFICIAL_EMAIL.to_string());
        let model_override = std::env::var("GEMINI_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            official_email,
            model_override,
            port,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            official_email: DEFAULT_OFFICIAL_EMAIL.to_string(),
            model_override: None,
            port: DEFAULT_PORT,
        }
    }
}
