//! HTTP server for the document chat UI

pub mod routes;
pub mod state;
pub mod templates;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::DocChatConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Document chat HTTP server
pub struct DocChatServer {
    config: DocChatConfig,
    state: AppState,
}

impl DocChatServer {
    /// Create a new server with Ollama-backed providers
    pub fn new(config: DocChatConfig) -> Self {
        let state = AppState::new(config.clone());
        Self { config, state }
    }

    /// Create a server over pre-built state (used by tests)
    pub fn with_state(config: DocChatConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .merge(routes::ui_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        // Reclaim sessions whose browser went away.
        let sweep_state = self.state.clone();
        let sweep_interval = Duration::from_secs(self.config.session.sweep_interval_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            loop {
                interval.tick().await;
                let pruned = sweep_state.sessions().prune_idle();
                if pruned > 0 {
                    tracing::debug!("Pruned {} idle session(s)", pruned);
                }
            }
        });

        let router = self.build_router();

        tracing::info!("Starting document chat server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness: verifies the chat provider is reachable
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    match state.llm().health_check().await {
        Ok(true) => axum::http::StatusCode::OK,
        _ => axum::http::StatusCode::SERVICE_UNAVAILABLE,
    }
}
