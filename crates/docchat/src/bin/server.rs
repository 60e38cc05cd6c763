//! Document chat server binary
//!
//! Run with: cargo run -p docchat --bin docchat-server

use std::path::Path;

use docchat::{config::DocChatConfig, server::DocChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional config file, default settings otherwise
    let config = match std::env::var("DOCCHAT_CONFIG") {
        Ok(path) => DocChatConfig::from_toml_file(Path::new(&path))?,
        Err(_) => DocChatConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Retrieval top-k: {}", config.retrieval.top_k);

    // Check Ollama availability up front; the server still starts without it
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running at {}", config.llm.base_url);
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with `ollama serve` and pull the models:");
            tracing::warn!("  ollama pull {}", config.llm.embed_model);
            tracing::warn!("  ollama pull {}", config.llm.chat_model);
        }
    }

    let server = DocChatServer::new(config);

    println!("DocChat running at http://{}", server.address());
    println!("Press Ctrl+C to stop");

    server.start().await?;

    Ok(())
}
