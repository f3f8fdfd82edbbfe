//! Ollama API Gateway library.

pub mod config;
pub mod gateway;
pub mod hello;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
