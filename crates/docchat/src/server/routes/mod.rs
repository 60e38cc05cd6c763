//! UI routes and session cookie plumbing

pub mod ask;
pub mod page;
pub mod process;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::server::state::AppState;

/// Cookie carrying the session id. No Max-Age, so it ends with the browser
/// session.
pub const SESSION_COOKIE: &str = "docchat_session";

/// Build the user-facing routes
pub fn ui_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(page::index))
        .route(
            "/process",
            post(process::process_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/ask", post(ask::ask_question))
}

/// Parse the session cookie out of the request headers
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Session cookie header value
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}
