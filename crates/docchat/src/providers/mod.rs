//! Provider abstractions for embeddings and chat completion
//!
//! Trait-based seams so the pipeline is independent of the hosted model
//! backing it; the shipped implementation talks to a local Ollama server.

pub mod chat;
pub mod embedding;
pub mod ollama;

pub use chat::ChatProvider;
pub use embedding::EmbeddingProvider;
pub use ollama::{OllamaChat, OllamaEmbedder, OllamaProvider};
