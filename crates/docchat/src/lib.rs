//! docchat: session-scoped PDF question answering
//!
//! Upload PDFs, the server extracts and chunks their text, embeds the chunks
//! into an in-memory index, and answers questions through a chat model while
//! keeping per-session conversational memory. Each browser session owns its
//! own index and transcript; nothing is persisted across restarts.

pub mod chat;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use chat::ChatEngine;
pub use config::DocChatConfig;
pub use error::{Error, Result};
pub use retrieval::{ChunkIndex, ScoredChunk};
pub use types::{
    chat::{ChatMessage, Role},
    chunk::Chunk,
    document::DocumentSummary,
};
