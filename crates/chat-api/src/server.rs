//! HTTP server
//!
//! Starts and manages the axum-based HTTP server.

use axum::Router;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::info;

use chat_core::{ChatStore, CompletionClient};

use crate::routes::routes;

/// Shared application state
///
/// The store sits behind a mutex whose guard is only ever held for the
/// duration of a synchronous store call, never across an await.
#[derive(Clone)]
pub struct AppState {
    pub completions: Arc<CompletionClient>,
    pub store: Arc<Mutex<ChatStore>>,
}

/// Build the application router with the given state
pub fn app(completions: Arc<CompletionClient>, store: Arc<Mutex<ChatStore>>) -> Router {
    Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .with_state(AppState { completions, store })
}

/// Start the HTTP server
pub async fn start_server(
    port: u16,
    completions: CompletionClient,
    store: ChatStore,
) -> anyhow::Result<()> {
    let app = app(Arc::new(completions), Arc::new(Mutex::new(store)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
