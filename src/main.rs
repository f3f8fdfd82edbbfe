//! Ollama API Gateway (v1)
//!
//! A stateless HTTP gateway in front of a local Ollama server, built with
//! Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                   GATEWAY                    │
//!   Client Request     │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ───────────────────┼─▶│   http   │──▶│ gateway  │──▶│ upstream │──┼──▶ Ollama
//!                      │  │  server  │   │ handlers │   │  client  │  │   (/api/*)
//!   Client Response    │  └──────────┘   └──────────┘   └──────────┘  │
//!   ◀──────────────────┼── verbatim body or {"detail": ...}          │
//!                      │                                              │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ollama_gateway::config::resolve_config;
use ollama_gateway::lifecycle::{signals, Shutdown};
use ollama_gateway::observability::{logging, metrics};
use ollama_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "ollama-gateway")]
#[command(about = "HTTP gateway in front of a local Ollama server", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("ollama-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
