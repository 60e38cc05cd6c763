//! Ollama-backed providers
//!
//! Wraps a shared [`OllamaClient`] to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::prompt::PromptMessage;
use crate::generation::OllamaClient;

use super::chat::ChatProvider;
use super::embedding::EmbeddingProvider;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder with its own client
    pub fn new(config: &LlmConfig, dimensions: usize) -> Self {
        Self {
            client: Arc::new(OllamaClient::new(config)),
            dimensions,
        }
    }

    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama chat provider
pub struct OllamaChat {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaChat {
    /// Create a new Ollama chat provider with its own client
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Arc::new(OllamaClient::new(config)),
            model: config.chat_model.clone(),
        }
    }

    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl ChatProvider for OllamaChat {
    async fn chat(&self, messages: &[PromptMessage]) -> Result<String> {
        self.client.chat(messages).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Combined provider sharing a single client for both concerns
pub struct OllamaProvider {
    embedder: OllamaEmbedder,
    chat: OllamaChat,
}

impl OllamaProvider {
    /// Create a combined provider from one shared client
    pub fn new(config: &LlmConfig, dimensions: usize) -> Self {
        let client = Arc::new(OllamaClient::new(config));
        Self {
            embedder: OllamaEmbedder::from_client(Arc::clone(&client), dimensions),
            chat: OllamaChat::from_client(client, config.chat_model.clone()),
        }
    }

    /// Split into separate providers
    pub fn split(self) -> (OllamaEmbedder, OllamaChat) {
        (self.embedder, self.chat)
    }
}
