//! Shared types

pub mod chat;
pub mod chunk;
pub mod document;

pub use chat::{ChatMessage, Role};
pub use chunk::Chunk;
pub use document::{DocumentSummary, StatusKind, StatusLine};
