//! Gateway endpoints.
//!
//! # Data Flow
//! ```text
//! caller
//!     → extract.rs (JSON shape check, 400 on failure)
//!     → handlers.rs (one upstream call per request)
//!     → upstream client
//!     → http::response (verbatim relay) or error.rs (status + detail)
//! ```
//!
//! # Design Decisions
//! - Every endpoint except /health propagates upstream failures
//! - /health reports failures as data and always answers 200
//! - No shared mutable state between handlers

pub mod error;
pub mod extract;
pub mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::server::AppState;
use self::handlers::*;

pub use error::{GatewayError, GatewayResult};
pub use types::{ChatMessage, ChatRequest, GenerationRequest};

pub fn setup_gateway_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/models", get(list_models))
        .route("/generate", post(generate))
        .route("/chat", post(chat))
        .route("/health", get(health))
        .with_state(state)
}
