//! API layer for the Copilot proxy server.
//!
//! This module contains the HTTP handlers, request/response models,
//! authentication, and streaming relay for the API endpoints.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod streaming;

// Re-export commonly used types
pub use auth::verify_auth;
pub use handlers::{chat_completions, health, list_models, metrics_handler, AppState};
pub use models::{ChatCompletionRequest, Message, MessageContent, ModelList};
pub use streaming::{relay_chat_completion, COMPLETIONS_URL};
