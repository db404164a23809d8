//! chat-core: Chat Service Core Library
//!
//! Provides the completion API client, configuration, and the
//! session/conversation store backing the HTTP surface.

pub mod config;
pub mod error;
pub mod llm;
pub mod store;

pub use config::{ApiConfig, Config, LlmConfig, StorageConfig};
pub use error::{Error, Result};
pub use llm::{ChatMessage, CompletionClient, HistoryEntry};
pub use store::{ChatStore, Role, Session, Turn};
