//! Retrieval-grounded conversational engine
//!
//! Binds one index, one conversation history, and the model providers. A
//! failed ask leaves the history untouched so the user can retry; only a
//! successful round trip appends the (human, assistant) pair.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{ChatProvider, EmbeddingProvider};
use crate::retrieval::ChunkIndex;
use crate::types::{ChatMessage, DocumentSummary};

struct EngineInner {
    index: ChunkIndex,
    history: Mutex<Vec<ChatMessage>>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn ChatProvider>,
    top_k: usize,
    documents: Vec<DocumentSummary>,
}

/// Cheaply cloneable handle to one processed document set.
///
/// Created only after a processing action completed successfully, replaced
/// wholesale when a new document set is processed, and dropped with the
/// session.
#[derive(Clone)]
pub struct ChatEngine {
    inner: Arc<EngineInner>,
}

impl ChatEngine {
    /// Create an engine over a freshly built index. History starts empty.
    pub fn new(
        index: ChunkIndex,
        documents: Vec<DocumentSummary>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn ChatProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                index,
                history: Mutex::new(Vec::new()),
                embedder,
                llm,
                top_k,
                documents,
            }),
        }
    }

    /// Answer `question` and record the exchange.
    ///
    /// Retrieval, prompt assembly, and generation all run against a snapshot
    /// of the history; the (human, assistant) pair is appended only after
    /// generation succeeds.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let query_embedding = self.inner.embedder.embed(question).await?;
        let retrieved = self.inner.index.search(&query_embedding, self.inner.top_k);

        tracing::debug!("Retrieved {} chunk(s) for question", retrieved.len());

        let snapshot = self.inner.history.lock().clone();
        let messages = PromptBuilder::build_messages(&snapshot, &retrieved, question);

        let answer = self.inner.llm.chat(&messages).await?;

        let mut history = self.inner.history.lock();
        history.push(ChatMessage::human(question));
        history.push(ChatMessage::assistant(answer.clone()));

        Ok(answer)
    }

    /// Current conversation history, oldest first
    pub fn history(&self) -> Vec<ChatMessage> {
        self.inner.history.lock().clone()
    }

    /// Number of transcript entries
    pub fn history_len(&self) -> usize {
        self.inner.history.lock().len()
    }

    /// Documents this engine was built over, in upload order
    pub fn documents(&self) -> &[DocumentSummary] {
        &self.inner.documents
    }

    /// Number of indexed chunks
    pub fn chunk_count(&self) -> usize {
        self.inner.index.len()
    }
}
