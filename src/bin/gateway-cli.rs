use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use ollama_gateway::gateway::{ChatMessage, ChatRequest, GenerationRequest};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the Ollama API Gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway itself is up
    Status,
    /// List models known to the upstream server
    Models,
    /// Report upstream health
    Health,
    /// Generate a completion for a single prompt
    Generate {
        #[arg(short, long)]
        model: String,
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long)]
        system: Option<String>,
        /// Bypass the model's prompt template
        #[arg(long)]
        raw: bool,
    },
    /// Send one user message to a chat model
    Chat {
        #[arg(short, long)]
        model: String,
        #[arg(long)]
        message: String,
        #[arg(short, long)]
        system: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/", base)).send().await?,
        Commands::Models => client.get(format!("{}/models", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Generate {
            model,
            prompt,
            system,
            raw,
        } => {
            let mut request = GenerationRequest::new(model, prompt);
            request.system = system;
            request.stream = Some(false);
            if raw {
                request.raw = Some(true);
            }
            post(&client, base, "/generate", &request).await?
        }
        Commands::Chat {
            model,
            message,
            system,
        } => {
            let mut messages = Vec::new();
            if let Some(system) = system {
                messages.push(ChatMessage::new("system", system));
            }
            messages.push(ChatMessage::new("user", message));

            let request = ChatRequest {
                model,
                messages,
                stream: Some(false),
                options: None,
            };
            post(&client, base, "/chat", &request).await?
        }
    };

    print_response(res).await
}

async fn post<T: Serialize>(
    client: &reqwest::Client,
    base: &str,
    path: &str,
    body: &T,
) -> Result<reqwest::Response, reqwest::Error> {
    client.post(format!("{}{}", base, path)).json(body).send().await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
