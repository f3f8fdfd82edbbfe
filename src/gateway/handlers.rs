use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::extract::Payload;
use crate::gateway::types::{ChatRequest, GenerationRequest};
use crate::http::response::passthrough;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

pub const ROOT_MESSAGE: &str = "Ollama API Gateway is running";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootStatus {
    pub message: String,
}

/// Upstream health as reported by `GET /health`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    pub fn unhealthy(error: Option<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

fn log_failure(endpoint: &'static str, err: UpstreamError) -> GatewayError {
    let err = GatewayError::from(err);
    tracing::error!(endpoint, status = %err.status(), error = %err, "Upstream call failed");
    err
}

pub async fn root() -> Json<RootStatus> {
    Json(RootStatus {
        message: ROOT_MESSAGE.to_string(),
    })
}

pub async fn list_models(State(state): State<AppState>) -> GatewayResult<Response> {
    let upstream = state
        .upstream
        .list_models()
        .await
        .map_err(|e| log_failure("/models", e))?;

    Ok(passthrough(upstream))
}

pub async fn generate(
    State(state): State<AppState>,
    Payload(request): Payload<GenerationRequest>,
) -> GatewayResult<Response> {
    tracing::debug!(model = %request.model, stream = ?request.stream, "Generate request");

    let upstream = state
        .upstream
        .generate(&request)
        .await
        .map_err(|e| log_failure("/generate", e))?;

    Ok(passthrough(upstream))
}

pub async fn chat(
    State(state): State<AppState>,
    Payload(request): Payload<ChatRequest>,
) -> GatewayResult<Response> {
    tracing::debug!(model = %request.model, messages = request.messages.len(), "Chat request");

    let upstream = state
        .upstream
        .chat(&request)
        .await
        .map_err(|e| log_failure("/chat", e))?;

    Ok(passthrough(upstream))
}

/// Never fails: upstream problems are reported in the body with status 200.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let report = match state.upstream.probe().await {
        Ok(StatusCode::OK) => HealthStatus::healthy(),
        Ok(status) => {
            tracing::warn!(status = %status, "Health check failed: non-200 status");
            HealthStatus::unhealthy(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed: connection error");
            HealthStatus::unhealthy(Some(e.to_string()))
        }
    };

    metrics::record_upstream_health(report.is_healthy());
    (StatusCode::OK, Json(report))
}
