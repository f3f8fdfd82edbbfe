//! JSON body extractor that rejects with `GatewayError::Validation`.
//!
//! axum's own `Json` answers 415/422 depending on what went wrong; the
//! gateway reports every malformed body as a plain 400. A body sent without
//! any `Content-Type` header is still decoded as JSON; a non-JSON content
//! type is rejected.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Json,
};
use serde::de::DeserializeOwned;

use crate::gateway::error::GatewayError;

/// A deserialized, shape-checked request body.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let path = req.uri().path().to_string();

        let decoded = if req.headers().contains_key(CONTENT_TYPE) {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text())
        } else {
            match Bytes::from_request(req, state).await {
                Ok(bytes) => serde_json::from_slice::<T>(&bytes)
                    .map_err(|e| format!("Failed to parse the request body as JSON: {e}")),
                Err(rejection) => Err(rejection.body_text()),
            }
        };

        decoded.map(Payload).map_err(|reason| {
            tracing::warn!(endpoint = %path, error = %reason, "Rejected request body");
            GatewayError::Validation(reason)
        })
    }
}
