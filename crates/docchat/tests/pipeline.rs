//! End-to-end pipeline test: a PDF goes in, a conversational answer comes
//! out. Model providers are substituted with deterministic fakes so the test
//! exercises extraction, chunking, indexing, retrieval, and history handling
//! without a running Ollama.

use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use docchat::chat::ChatEngine;
use docchat::error::{Error, Result};
use docchat::generation::prompt::PromptMessage;
use docchat::ingestion::{extract_documents, TextChunker, UploadedFile};
use docchat::providers::{ChatProvider, EmbeddingProvider};
use docchat::retrieval::ChunkIndex;
use docchat::types::Role;

/// Build a single-page PDF containing `text`
fn pdf_with_text(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

/// Deterministic embedder: counts of marker words
struct MarkerEmbedder;

const MARKERS: [&str; 3] = ["alpha", "beta", "gamma"];

#[async_trait]
impl EmbeddingProvider for MarkerEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(MARKERS
            .iter()
            .map(|marker| lower.matches(marker).count() as f32)
            .collect())
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "marker"
    }
}

/// Chat fake that can be flipped into a failing mode
struct ScriptedChat {
    fail: bool,
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn chat(&self, messages: &[PromptMessage]) -> Result<String> {
        if self.fail {
            return Err(Error::generation("model unreachable"));
        }
        let question = &messages.last().expect("at least one message").content;
        Ok(format!("The documents mention: {question}"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

async fn build_engine(files: &[UploadedFile], fail_chat: bool) -> Result<ChatEngine> {
    let corpus = extract_documents(files)?;
    let chunks = TextChunker::new(1000, 200, '\n').chunk(&corpus.text);
    let index = ChunkIndex::build(chunks, &MarkerEmbedder).await?;
    Ok(ChatEngine::new(
        index,
        corpus.documents,
        Arc::new(MarkerEmbedder),
        Arc::new(ScriptedChat { fail: fail_chat }),
        4,
    ))
}

#[tokio::test]
async fn upload_to_answer_round_trip() {
    let files = vec![UploadedFile {
        filename: "notes.pdf".to_string(),
        data: pdf_with_text("Alpha Beta Gamma"),
    }];

    // Extraction carries the page text through verbatim.
    let corpus = extract_documents(&files).expect("extraction succeeds");
    assert!(corpus.text.contains("Alpha Beta Gamma"));

    // A corpus shorter than the window chunks to exactly one piece.
    let chunks = TextChunker::new(1000, 200, '\n').chunk(&corpus.text);
    assert_eq!(chunks.len(), 1);

    // The single-chunk index answers the query.
    let index = ChunkIndex::build(chunks, &MarkerEmbedder)
        .await
        .expect("index builds");
    assert_eq!(index.len(), 1);
    let query = MarkerEmbedder.embed("Alpha").await.unwrap();
    let retrieved = index.search(&query, 4);
    assert_eq!(retrieved.len(), 1);
    assert!(retrieved[0].chunk.content.contains("Alpha Beta Gamma"));

    // Asking appends exactly (human, assistant) and returns a non-empty
    // answer.
    let engine = build_engine(&files, false).await.expect("engine builds");
    let answer = engine
        .ask("What is mentioned?")
        .await
        .expect("ask succeeds");
    assert!(!answer.is_empty());

    let history = engine.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::Human);
    assert_eq!(history[1].role, Role::Assistant);
}

#[tokio::test]
async fn generation_failure_preserves_history() {
    let files = vec![UploadedFile {
        filename: "notes.pdf".to_string(),
        data: pdf_with_text("Alpha Beta Gamma"),
    }];

    let engine = build_engine(&files, true).await.expect("engine builds");
    let err = engine.ask("anything").await.expect_err("chat must fail");
    assert!(matches!(err, Error::Generation(_)));
    assert!(engine.history().is_empty());
}

#[tokio::test]
async fn reprocessing_starts_with_a_fresh_transcript() {
    let files = vec![UploadedFile {
        filename: "notes.pdf".to_string(),
        data: pdf_with_text("Alpha Beta Gamma"),
    }];

    let first = build_engine(&files, false).await.expect("engine builds");
    first.ask("one").await.expect("ask succeeds");
    first.ask("two").await.expect("ask succeeds");
    assert_eq!(first.history().len(), 4);

    // A new processing action yields a new engine with no memory of the old
    // conversation.
    let second = build_engine(&files, false).await.expect("engine builds");
    assert!(second.history().is_empty());
}

#[tokio::test]
async fn corrupt_upload_fails_extraction() {
    let files = vec![UploadedFile {
        filename: "junk.pdf".to_string(),
        data: vec![0u8; 64],
    }];

    let err = extract_documents(&files).expect_err("garbage must fail");
    assert!(matches!(err, Error::Extraction { .. }));
}

#[tokio::test]
async fn empty_corpus_never_becomes_an_index() {
    let chunks = TextChunker::new(1000, 200, '\n').chunk("");
    assert!(chunks.is_empty());

    let err = ChunkIndex::build(chunks, &MarkerEmbedder)
        .await
        .expect_err("empty corpus must be refused");
    assert!(matches!(err, Error::EmptyCorpus));
}
