//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all gateway handlers
//! - Wire up middleware (request ID, tracing, body limit, metrics)
//! - Bind server to listener
//! - Shut down gracefully on signal

use axum::{extract::DefaultBodyLimit, middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::gateway::setup_gateway_router;
use crate::http::request::{make_request_span, UuidRequestId};
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
///
/// Immutable after startup; every handler gets its own clone.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let state = AppState { upstream };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        setup_gateway_router(state)
            .route_layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn unreachable_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        // Nothing listens on port 9 (discard) in test environments
        config.upstream.base_url = "http://127.0.0.1:9".into();
        config.upstream.use_env_proxy = false;
        config
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_root_needs_no_upstream() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, body) = call(
            server.router(),
            Request::get("/").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Ollama API Gateway is running"}));
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let server = HttpServer::new(unreachable_config()).unwrap();

        let response = server
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let response = server
            .router()
            .oneshot(
                Request::get("/")
                    .header("x-request-id", "caller-chosen")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "caller-chosen");
    }

    #[tokio::test]
    async fn test_generate_missing_prompt_is_bad_request() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, body) = call(
            server.router(),
            Request::post("/generate")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"model":"llama3"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("prompt"));
    }

    #[tokio::test]
    async fn test_chat_missing_model_is_bad_request() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, body) = call(
            server.router(),
            Request::post("/chat")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"messages":[]}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("model"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, _) = call(
            server.router(),
            Request::post("/generate")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_decoded() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, body) = call(
            server.router(),
            Request::post("/generate")
                .body(Body::from(r#"{"model":"llama3","prompt":"hi"}"#))
                .unwrap(),
        )
        .await;

        // Validation passed; the dead upstream is what fails.
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Connection error"));
    }

    #[tokio::test]
    async fn test_body_without_content_type_still_validated() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, body) = call(
            server.router(),
            Request::post("/chat")
                .body(Body::from(r#"{"messages":[]}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("model"));
    }

    #[tokio::test]
    async fn test_non_json_content_type_is_bad_request() {
        let server = HttpServer::new(unreachable_config()).unwrap();
        let (status, _) = call(
            server.router(),
            Request::post("/generate")
                .header("content-type", "text/plain")
                .body(Body::from(r#"{"model":"llama3","prompt":"hi"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_requests_and_health_are_recorded() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let server = HttpServer::new(unreachable_config()).unwrap();
                let (status, _) = call(
                    server.router(),
                    Request::get("/").body(Body::empty()).unwrap(),
                )
                .await;
                assert_eq!(status, StatusCode::OK);

                let (status, body) = call(
                    server.router(),
                    Request::get("/health").body(Body::empty()).unwrap(),
                )
                .await;
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body["status"], "unhealthy");
            });
        });

        let rendered = handle.render();
        assert!(rendered.contains("gateway_requests_total{"), "{rendered}");
        assert!(rendered.contains(r#"path="/health""#), "{rendered}");
        assert!(rendered.contains(r#"status="200""#), "{rendered}");
        assert!(rendered.contains("gateway_request_duration_seconds"), "{rendered}");
        assert!(rendered.contains("gateway_upstream_healthy 0"), "{rendered}");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = unreachable_config();
        config.limits.max_body_size = 64;
        let server = HttpServer::new(config).unwrap();

        let prompt = "x".repeat(256);
        let body = json!({"model": "llama3", "prompt": prompt}).to_string();
        let response = server
            .router()
            .oneshot(
                Request::post("/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
