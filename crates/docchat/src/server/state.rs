//! Shared application state

use std::sync::Arc;

use crate::config::DocChatConfig;
use crate::providers::{ChatProvider, EmbeddingProvider, OllamaProvider};
use crate::session::SessionStore;

/// Shared application state, cheap to clone into handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocChatConfig,
    /// Embedding provider
    embedder: Arc<dyn EmbeddingProvider>,
    /// Chat provider
    llm: Arc<dyn ChatProvider>,
    /// Live browser sessions
    sessions: SessionStore,
}

impl AppState {
    /// Create application state with Ollama-backed providers sharing one
    /// client
    pub fn new(config: DocChatConfig) -> Self {
        let (embedder, llm) =
            OllamaProvider::new(&config.llm, config.embeddings.dimensions).split();

        tracing::info!(
            "Application state initialized (embed: {}, chat: {})",
            config.llm.embed_model,
            config.llm.chat_model
        );

        Self::with_providers(config, Arc::new(embedder), Arc::new(llm))
    }

    /// Construct with injected providers (used by tests)
    pub fn with_providers(
        config: DocChatConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn ChatProvider>,
    ) -> Self {
        let sessions = SessionStore::new(&config.session);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                llm,
                sessions,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &DocChatConfig {
        &self.inner.config
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the chat provider
    pub fn llm(&self) -> &Arc<dyn ChatProvider> {
        &self.inner.llm
    }

    /// Get the session registry
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}
