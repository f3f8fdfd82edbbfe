//! Upstream inference server client.
//!
//! # Data Flow
//! ```text
//! gateway handler
//!     → client.rs (build URL from base, send one request)
//!     → Ollama (GET /api/tags, POST /api/generate, POST /api/chat, GET /)
//!     → UpstreamResponse (status 200, body bytes untouched)
//!       or UpstreamError (non-200 status / transport failure)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound request per call; no retries
//! - Only status 200 counts as success; the body is never parsed
//! - reqwest's default timeouts are used as-is

pub mod client;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse, UpstreamResult};
