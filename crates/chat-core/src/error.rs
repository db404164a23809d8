//! Error types for chat-core

use thiserror::Error;

/// Main error type for chat-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Completion API error: {0}")]
    Completion(String),

    /// Guard result for a blank message; no outbound call is made.
    #[error("Empty message")]
    EmptyMessage,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for chat-core
pub type Result<T> = std::result::Result<T, Error>;
