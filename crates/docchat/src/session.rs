//! Per-browser-session state
//!
//! Sessions are keyed by a cookie UUID, created on first contact, and
//! reclaimed by an idle sweep once the browser stops coming back. Everything
//! in here lives in process memory only.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::chat::ChatEngine;
use crate::config::SessionConfig;
use crate::types::{ChatMessage, DocumentSummary, StatusLine};

/// Mutable state for one browser session
pub struct Session {
    /// Present once a document set has been processed successfully
    engine: Option<ChatEngine>,
    /// First N characters of the extracted text, for the preview panel
    preview: Option<String>,
    /// Last status line to show the user
    status: Option<StatusLine>,
    /// Last request from this session
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            engine: None,
            preview: None,
            status: None,
            last_seen: Utc::now(),
        }
    }
}

/// Everything the page render needs, copied out in one short lock
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub preview: Option<String>,
    pub status: Option<StatusLine>,
    pub transcript: Vec<ChatMessage>,
    pub documents: Vec<DocumentSummary>,
    pub has_engine: bool,
}

/// Registry of live sessions with idle expiry
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Create a store from configuration
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout: Duration::seconds(config.idle_timeout_secs as i64),
        }
    }

    /// Look up the session for `id`, creating it on first contact, and mark
    /// it as seen. Returns the id in use (fresh when no cookie came in).
    pub fn touch(&self, id: Option<Uuid>) -> Uuid {
        let id = id.unwrap_or_else(Uuid::new_v4);
        self.sessions
            .entry(id)
            .or_insert_with(Session::new)
            .last_seen = Utc::now();
        id
    }

    /// Install a freshly built engine, replacing any previous one and its
    /// history
    pub fn install_engine(
        &self,
        id: Uuid,
        engine: ChatEngine,
        preview: String,
        status: StatusLine,
    ) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.engine = Some(engine);
            session.preview = Some(preview);
            session.status = Some(status);
            session.last_seen = Utc::now();
        }
    }

    /// Set or clear the session's status line
    pub fn set_status(&self, id: Uuid, status: Option<StatusLine>) {
        if let Some(mut session) = self.sessions.get_mut(&id) {
            session.status = status;
        }
    }

    /// The session's engine handle, if documents have been processed
    pub fn engine(&self, id: Uuid) -> Option<ChatEngine> {
        self.sessions.get(&id).and_then(|s| s.engine.clone())
    }

    /// Snapshot everything the page render needs
    pub fn view(&self, id: Uuid) -> SessionView {
        match self.sessions.get(&id) {
            Some(session) => SessionView {
                preview: session.preview.clone(),
                status: session.status.clone(),
                transcript: session
                    .engine
                    .as_ref()
                    .map(|e| e.history())
                    .unwrap_or_default(),
                documents: session
                    .engine
                    .as_ref()
                    .map(|e| e.documents().to_vec())
                    .unwrap_or_default(),
                has_engine: session.engine.is_some(),
            },
            None => SessionView::default(),
        }
    }

    /// Drop sessions idle longer than the timeout. Returns how many were
    /// removed.
    pub fn prune_idle(&self) -> usize {
        let cutoff = Utc::now() - self.idle_timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.last_seen >= cutoff);
        before - self.sessions.len()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::generation::prompt::PromptMessage;
    use crate::providers::{ChatProvider, EmbeddingProvider};
    use crate::retrieval::ChunkIndex;
    use crate::types::Chunk;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubChat;

    #[async_trait]
    impl ChatProvider for StubChat {
        async fn chat(&self, _messages: &[PromptMessage]) -> Result<String> {
            Ok("ok".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    async fn stub_engine() -> ChatEngine {
        let index = ChunkIndex::build(vec![Chunk::new(0, "text")], &StubEmbedder)
            .await
            .expect("index builds");
        ChatEngine::new(index, Vec::new(), Arc::new(StubEmbedder), Arc::new(StubChat), 4)
    }

    fn store(idle_timeout_secs: u64) -> SessionStore {
        SessionStore::new(&SessionConfig {
            idle_timeout_secs,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn touch_creates_a_session_on_first_contact() {
        let store = store(60);
        let id = store.touch(None);
        assert_eq!(store.len(), 1);

        // Same cookie maps to the same session.
        assert_eq!(store.touch(Some(id)), id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn view_of_unknown_session_is_empty() {
        let store = store(60);
        let view = store.view(Uuid::new_v4());
        assert!(!view.has_engine);
        assert!(view.transcript.is_empty());
        assert!(view.status.is_none());
    }

    #[tokio::test]
    async fn install_engine_resets_history() {
        let store = store(60);
        let id = store.touch(None);

        let first = stub_engine().await;
        first.ask("question").await.expect("ask succeeds");
        store.install_engine(id, first, "preview".into(), StatusLine::success("done"));
        assert_eq!(store.view(id).transcript.len(), 2);

        // Re-processing installs a fresh engine with an empty transcript.
        let second = stub_engine().await;
        store.install_engine(id, second, "preview".into(), StatusLine::success("done"));

        let view = store.view(id);
        assert!(view.has_engine);
        assert!(view.transcript.is_empty());
    }

    #[test]
    fn prune_removes_idle_sessions() {
        let store = store(0);
        store.touch(None);
        std::thread::sleep(std::time::Duration::from_millis(10));

        assert_eq!(store.prune_idle(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn set_status_clears_and_sets() {
        let store = store(60);
        let id = store.touch(None);

        store.set_status(id, Some(StatusLine::warning("careful")));
        assert_eq!(store.view(id).status.unwrap().message, "careful");

        store.set_status(id, None);
        assert!(store.view(id).status.is_none());
    }
}
