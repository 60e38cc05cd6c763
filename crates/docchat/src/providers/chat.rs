//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::generation::prompt::PromptMessage;

/// Produces an assistant reply for an ordered message sequence.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Complete the conversation and return the assistant's reply text
    async fn chat(&self, messages: &[PromptMessage]) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier used for generation
    fn model(&self) -> &str;
}
