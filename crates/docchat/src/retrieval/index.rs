//! In-memory cosine-similarity index over embedded chunks
//!
//! One index covers one processed upload; it is rebuilt from scratch on every
//! processing action and never persisted. Lookup is a brute-force scan over
//! unit-normalized vectors.

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::Chunk;

/// A retrieved chunk with its similarity to the query
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity in [-1.0, 1.0], higher is more similar
    pub similarity: f32,
}

#[derive(Debug)]
struct IndexEntry {
    chunk: Chunk,
    /// Unit-normalized embedding; cosine similarity reduces to a dot product
    embedding: Vec<f32>,
}

/// Immutable nearest-neighbor index over one upload's chunks
#[derive(Debug)]
pub struct ChunkIndex {
    entries: Vec<IndexEntry>,
    dimensions: usize,
}

impl ChunkIndex {
    /// Embed every chunk and build the index.
    ///
    /// Refuses an empty corpus; a queryable-but-empty index would make every
    /// later question silently contextless.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        let dimensions = embeddings.first().map(|e| e.len()).unwrap_or(0);
        if dimensions == 0 {
            return Err(Error::embedding("model returned a zero-length vector"));
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, mut embedding) in chunks.into_iter().zip(embeddings) {
            if embedding.len() != dimensions {
                return Err(Error::embedding(format!(
                    "dimension mismatch: expected {}, got {}",
                    dimensions,
                    embedding.len()
                )));
            }
            normalize(&mut embedding);
            entries.push(IndexEntry { chunk, embedding });
        }

        tracing::info!("Built index over {} chunks ({} dims)", entries.len(), dimensions);

        Ok(Self {
            entries,
            dimensions,
        })
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimensions
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Top-k chunks by cosine similarity, ties broken by chunk order
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let query = {
            let mut q = query_embedding.to_vec();
            normalize(&mut q);
            q
        };

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                similarity: dot(&entry.embedding, &query),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.chunk.seq.cmp(&b.chunk.seq))
        });
        scored.truncate(top_k);
        scored
    }
}

fn normalize(vector: &mut [f32]) {
    let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > f32::EPSILON {
        for v in vector.iter_mut() {
            *v /= magnitude;
        }
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
