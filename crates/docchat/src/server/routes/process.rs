//! Upload-and-process route
//!
//! Runs the whole pipeline for one upload batch: extract -> chunk ->
//! embed/index -> fresh engine. Only a fully successful run replaces the
//! session's engine; a failed run reports the first error and leaves any
//! previous engine (and its transcript) in place.

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::chat::ChatEngine;
use crate::error::{Error, Result};
use crate::ingestion::{extract_documents, TextChunker, UploadedFile};
use crate::retrieval::ChunkIndex;
use crate::server::state::AppState;
use crate::types::StatusLine;

use super::{session_cookie, session_id_from_headers};

/// POST /process - upload PDFs and build this session's answer engine
///
/// Transport-level failures (unreadable multipart body) surface as HTTP
/// errors; pipeline failures become session status text.
pub async fn process_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let id = state.sessions().touch(session_id_from_headers(&headers));

    let files = collect_files(multipart).await?;

    if let Err(e) = run_pipeline(&state, id, files).await {
        tracing::warn!("Processing failed: {}", e);
        state
            .sessions()
            .set_status(id, Some(StatusLine::error(format!("Processing failed: {}", e))));
    }

    Ok(([(header::SET_COOKIE, session_cookie(id))], Redirect::to("/")))
}

/// Drain the multipart body into uploaded files, skipping empty parts
async fn collect_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("documents") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::internal(format!("Failed to read '{}': {}", filename, e)))?;

        if data.is_empty() {
            continue;
        }

        files.push(UploadedFile {
            filename,
            data: data.to_vec(),
        });
    }

    Ok(files)
}

async fn run_pipeline(state: &AppState, id: Uuid, files: Vec<UploadedFile>) -> Result<()> {
    if files.is_empty() {
        return Err(Error::EmptyCorpus);
    }

    let start = Instant::now();
    tracing::info!("Processing {} file(s)", files.len());

    let corpus = extract_documents(&files)?;
    let preview = truncate_chars(&corpus.text, state.config().session.preview_chars);

    let chunker = TextChunker::from_config(&state.config().chunking);
    let chunks = chunker.chunk(&corpus.text);
    if chunks.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    tracing::info!("Chunked corpus into {} piece(s)", chunks.len());

    let index = ChunkIndex::build(chunks, state.embedder().as_ref()).await?;

    let engine = ChatEngine::new(
        index,
        corpus.documents,
        Arc::clone(state.embedder()),
        Arc::clone(state.llm()),
        state.config().retrieval.top_k,
    );

    let status = StatusLine::success(format!(
        "Documents processed successfully ({} chunks in {:.1}s)",
        engine.chunk_count(),
        start.elapsed().as_secs_f64()
    ));
    state.sessions().install_engine(id, engine, preview, status);

    Ok(())
}

/// First `max` characters of `text`, on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
