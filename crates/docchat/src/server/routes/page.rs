//! Page rendering route

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
};

use crate::server::state::AppState;
use crate::server::templates;

use super::{session_cookie, session_id_from_headers};

/// GET / - render the upload panel, preview, status, and chat transcript
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let id = state.sessions().touch(session_id_from_headers(&headers));
    let view = state.sessions().view(id);
    let page = templates::render_page(&view);

    ([(header::SET_COOKIE, session_cookie(id))], Html(page))
}
