//! Completion API client and types
//!
//! OpenAI-compatible chat completions (Groq, OpenAI, etc.)

mod client;
mod types;

pub use client::CompletionClient;
pub use types::*;
