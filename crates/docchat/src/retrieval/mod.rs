//! In-memory vector retrieval

pub mod index;

pub use index::{ChunkIndex, ScoredChunk};
