//! Tutorial "hello world" API server.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use ollama_gateway::config::resolve_service_config;
use ollama_gateway::hello::setup_hello_router;
use ollama_gateway::lifecycle::signals;
use ollama_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "hello-api")]
#[command(about = "Tutorial hello-world API", long_about = None)]
struct Args {
    /// Optional TOML configuration file (only [listener] and [observability] are used).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_service_config(args.config.as_deref())?;
    logging::init_logging(&config.observability)?;

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "hello-api listening");

    axum::serve(listener, setup_hello_router())
        .with_graceful_shutdown(signals::wait_for_signal())
        .await?;

    tracing::info!("hello-api stopped");
    Ok(())
}
