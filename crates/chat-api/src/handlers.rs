//! HTTP request handlers
//!
//! The orchestration layer: validate input, read/write the store, drive
//! the completion client, shape JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Html;
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use chat_core::{HistoryEntry, Role, Session, Turn};

use crate::error::{ApiError, Result};
use crate::server::AppState;

/// Landing page markup, served at `/`
const INDEX_HTML: &str = include_str!("../static/index.html");

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// System instruction for the new session; fixed for its lifetime
    #[serde(default)]
    pub system_prompt: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    /// Wall-clock time of the reply, HH:MM
    pub timestamp: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub system_prompt: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionInfo>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TurnInfo {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversations: Vec<TurnInfo>,
    pub status: &'static str,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.session_id,
            system_prompt: session.system_prompt,
            created_at: session.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<Turn> for TurnInfo {
    fn from(turn: Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content,
            timestamp: turn.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// ============================================================================
// Handler functions
// ============================================================================

/// Landing page
pub async fn home() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Create a new session with an optional system prompt
pub async fn create_session(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>> {
    // The body is optional; a missing one means an empty prompt
    let system_prompt = payload
        .map(|Json(req)| req.system_prompt)
        .unwrap_or_default();

    let session = {
        let store = state.store.lock().unwrap();
        store.create_session(&system_prompt)?
    };

    info!("Created session {}", session.session_id);

    Ok(Json(CreateSessionResponse {
        session_id: session.session_id,
        status: "success",
    }))
}

/// One chat exchange: persist the user turn, call the completion API with
/// this session's stored system prompt, persist the assistant turn
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|_| ApiError::InvalidJson)?;

    let session_id = req.session_id.ok_or(ApiError::MissingSessionId)?;
    let message = req.message.trim().to_string();

    debug!("Chat request for session {}", session_id);

    let (session, history) = {
        let store = state.store.lock().unwrap();

        let session = store
            .find_session(&session_id)?
            .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

        // Blank messages are rejected by the completion call below;
        // nothing is persisted for them.
        if !message.is_empty() {
            store.append_turn(session.id, Role::User, &message)?;
        }

        let history: Vec<HistoryEntry> = store
            .list_turns(session.id)?
            .into_iter()
            .map(|turn| HistoryEntry {
                is_user: turn.role == Role::User,
                content: turn.content,
            })
            .collect();

        (session, history)
    };

    // The session's stored prompt travels with the call; the client holds
    // no per-session state.
    let reply = state
        .completions
        .get_response(&session.system_prompt, &message, &history)
        .await
        .inspect_err(|e| error!("Completion call failed for session {}: {}", session_id, e))?;

    {
        let store = state.store.lock().unwrap();
        store.append_turn(session.id, Role::Assistant, &reply)?;
    }

    Ok(Json(ChatResponse {
        response: reply,
        timestamp: Local::now().format("%H:%M").to_string(),
        status: "success",
    }))
}

/// List all sessions, most recently created first
pub async fn get_sessions(State(state): State<AppState>) -> Result<Json<SessionsResponse>> {
    let sessions = {
        let store = state.store.lock().unwrap();
        store.list_sessions()?
    };

    Ok(Json(SessionsResponse {
        sessions: sessions.into_iter().map(SessionInfo::from).collect(),
        status: "success",
    }))
}

/// Full ordered turn history for a session
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationResponse>> {
    let turns = {
        let store = state.store.lock().unwrap();

        let session = store
            .find_session(&session_id)?
            .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;

        store.list_turns(session.id)?
    };

    Ok(Json(ConversationResponse {
        conversations: turns.into_iter().map(TurnInfo::from).collect(),
        status: "success",
    }))
}
