//! HTTP client for the Ollama API.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

/// Upstream model-listing endpoint.
pub const TAGS_PATH: &str = "api/tags";
/// Upstream generation endpoint.
pub const GENERATE_PATH: &str = "api/generate";
/// Upstream chat endpoint.
pub const CHAT_PATH: &str = "api/chat";

/// Errors that can occur while talking to the upstream server.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with something other than 200.
    #[error("upstream returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Connection refused, DNS failure, timeout, or a broken body.
    #[error("failed to reach upstream at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured base URL cannot be used.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// A successful (status 200) upstream response, body untouched.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub content_type: HeaderValue,
    pub body: Vec<u8>,
}

/// Thin wrapper over `reqwest::Client` bound to one upstream base URL.
///
/// Cloning is cheap: the reqwest client is reference counted and connection
/// reuse is whatever reqwest does by default.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a client for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(UpstreamError::Client)?;

        Ok(Self { client, base_url })
    }

    /// The normalized base URL (always ends with '/').
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/tags`.
    pub async fn list_models(&self) -> UpstreamResult<UpstreamResponse> {
        self.send::<()>(Method::GET, TAGS_PATH, None).await
    }

    /// `POST /api/generate` with the given payload.
    pub async fn generate<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> UpstreamResult<UpstreamResponse> {
        self.send(Method::POST, GENERATE_PATH, Some(payload)).await
    }

    /// `POST /api/chat` with the given payload.
    pub async fn chat<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> UpstreamResult<UpstreamResponse> {
        self.send(Method::POST, CHAT_PATH, Some(payload)).await
    }

    /// Bare `GET /` against the server root. Returns whatever status came back.
    pub async fn probe(&self) -> UpstreamResult<StatusCode> {
        let url = self.base_url.clone();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(response.status())
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&T>,
    ) -> UpstreamResult<UpstreamResponse> {
        let url = self.base_url.join(path)?;

        tracing::debug!(method = %method, url = %url, "Forwarding to upstream");

        let mut request = self.client.request(method, url.clone());
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let transport = |source: reqwest::Error| UpstreamError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        let body = response.bytes().await.map_err(transport)?;

        if status != StatusCode::OK {
            return Err(UpstreamError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(UpstreamResponse {
            content_type,
            body: body.to_vec(),
        })
    }
}
