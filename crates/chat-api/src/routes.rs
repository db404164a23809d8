//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{chat, create_session, get_conversation, get_sessions, home};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home))
        // Session management
        .route("/create_session", post(create_session))
        .route("/get_sessions", get(get_sessions))
        .route("/get_conversation/{session_id}", get(get_conversation))
        // Chat endpoint
        .route("/chat", post(chat))
}
