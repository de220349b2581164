//! Axum HTTP surface for the computation service.
//!
//! # Endpoints
//!
//! - `POST /bfhl`   — the single computation endpoint
//! - `GET  /health` — unconditional liveness probe
//! - anything else  — 404 error envelope

pub mod envelope;
pub mod routes;

pub use envelope::Envelope;
pub use routes::{app_router, AppState};
