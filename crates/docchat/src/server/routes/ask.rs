//! Question submission route

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect},
    Form,
};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::StatusLine;

use super::{session_cookie, session_id_from_headers};

/// Question form body
#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// POST /ask - validate preconditions, run the engine, record the outcome
///
/// An empty question or a missing engine produces a classified warning
/// without touching the engine; a generation failure is reported as
/// transient and leaves the transcript unchanged.
pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AskForm>,
) -> impl IntoResponse {
    let id = state.sessions().touch(session_id_from_headers(&headers));

    let outcome = answer(&state, id, form.question.trim()).await;

    let status = match outcome {
        Ok(_) => None,
        Err(Error::InvalidQuestion) => Some(StatusLine::warning("Please enter a valid question.")),
        Err(Error::NoDocuments) => Some(StatusLine::warning(
            "Please upload and process a document first.",
        )),
        Err(e) => {
            tracing::warn!("Ask failed: {}", e);
            Some(StatusLine::warning(format!(
                "Could not answer right now: {}. Please try again.",
                e
            )))
        }
    };
    state.sessions().set_status(id, status);

    ([(header::SET_COOKIE, session_cookie(id))], Redirect::to("/"))
}

async fn answer(state: &AppState, id: uuid::Uuid, question: &str) -> Result<String> {
    if question.is_empty() {
        return Err(Error::InvalidQuestion);
    }

    let engine = state.sessions().engine(id).ok_or(Error::NoDocuments)?;
    engine.ask(question).await
}
