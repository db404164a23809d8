//! chat-api: HTTP surface for the chat service
//!
//! Routes, handlers, and the error envelope. Built with axum for async
//! HTTP handling.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{AppState, app, start_server};
