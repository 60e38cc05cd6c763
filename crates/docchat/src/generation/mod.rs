//! Hosted model access and prompt construction

pub mod ollama;
pub mod prompt;

pub use ollama::OllamaClient;
pub use prompt::{PromptBuilder, PromptMessage};
