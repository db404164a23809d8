//! chat-relay: Chat Service Main Binary
//!
//! Usage:
//!   chat-relay           - Start the HTTP server
//!   chat-relay --help    - Show help
//!   chat-relay --version - Show version

use chat_core::{ChatStore, CompletionClient, Config};
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// HTTP server mode
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("chat-relay {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting chat-relay...");
    tracing::info!("Model: {}", config.llm.model);

    // Probe failure here is fatal: the service is useless without a
    // reachable completion API.
    let completions = CompletionClient::connect(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize completion client: {}", e))?;

    let store = ChatStore::new(&config.storage.db_path)
        .map_err(|e| anyhow::anyhow!("Failed to open chat store: {}", e))?;

    chat_api::start_server(config.api.port, completions, store).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("chat-relay - Minimal LLM chat web service");
    println!();
    println!("Usage:");
    println!("  chat-relay           Start the HTTP server");
    println!("  chat-relay --help    Show this help message");
    println!("  chat-relay --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  LLM_API_KEY          Completion API key (required)");
    println!("  LLM_MODEL            Model name (default: llama-3.2-90b-vision-preview)");
    println!("  LLM_BASE_URL         OpenAI-compatible API endpoint");
    println!("  API_PORT             HTTP port (default: 3000)");
    println!("  DB_PATH              SQLite database path (default: data/chat.db)");
}
