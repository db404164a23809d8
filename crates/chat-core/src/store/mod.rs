//! Session and conversation persistence
//!
//! Two append-only tables in SQLite: sessions (a conversation context with
//! a fixed system prompt) and conversations (time-ordered turns).

mod sqlite;
mod types;

pub use sqlite::ChatStore;
pub use types::{Role, Session, Turn};
