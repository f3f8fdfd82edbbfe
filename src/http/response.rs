//! Response relaying.
//!
//! # Responsibilities
//! - Relay a successful upstream body to the caller byte-for-byte
//! - Preserve the upstream Content-Type
//!
//! Error translation lives in `gateway::error`.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::upstream::UpstreamResponse;

/// Turn a 200 upstream response into a 200 gateway response, body untouched.
pub fn passthrough(upstream: UpstreamResponse) -> Response {
    ([(header::CONTENT_TYPE, upstream.content_type)], upstream.body).into_response()
}
