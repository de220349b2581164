//! # bfhl-service
//!
//! A single-endpoint JSON computation service. `POST /bfhl` accepts a body
//! with exactly one of the keys `fibonacci`, `prime`, `lcm`, `hcf` or `AI`
//! and answers with a normalized success/error envelope. The `AI` key is
//! served by a sequential fallback chain over Gemini model candidates.
//!
//! The crate splits into pure numeric kernels, a strict request parser, the
//! generative backend abstraction, and the axum HTTP surface. The server
//! binary wires configuration and middleware around [`server::app_router`].

pub mod config;
pub mod error;
pub mod kernels;
pub mod llm;
pub mod operation;
pub mod server;

/// Crate version, reported in startup logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::ServiceConfig;
pub use error::ApiError;
pub use llm::GenerativeBackend;
pub use operation::Operation;
