//! Copilot Proxy Server - An authenticating reverse proxy for the GitHub
//! Copilot chat completions API.
//!
//! This library exposes an OpenAI-compatible chat-completions API backed by
//! the Copilot completions provider, with:
//!
//! - **Caller Authentication**: Bearer tokens validated against a configured
//!   allow-list
//! - **Token Lifecycle Management**: A single short-lived upstream access
//!   token shared across concurrent requests and refreshed just-in-time
//! - **Request Normalization**: Structured content arrays flattened into the
//!   plain-string dialect the upstream accepts
//! - **Streaming Support**: Server-Sent Events relayed verbatim, or
//!   synthesized for reasoning models that only answer single-shot
//! - **Metrics & Monitoring**: Prometheus metrics for observability
//!
//! # Architecture
//!
//! The codebase is organized into four layers:
//!
//! - [`core`]: Core functionality (config, errors, logging context, metrics)
//! - [`api`]: HTTP handlers, request/response models, auth, streaming relay
//! - [`services`]: Business logic (upstream token lifecycle)
//! - [`transformer`]: Request/response translation between wire dialects
//!
//! # Configuration
//!
//! The server reads `config.json` (override with `CONFIG_PATH`):
//! - `refresh_token`: Long-lived GitHub credential
//! - `host` / `port`: Bind address
//! - `auth_tokens`: Caller-facing bearer tokens
//!
//! Optional environment variables: `HOST`, `PORT`, `REQUEST_TIMEOUT_SECS`.

pub mod api;
pub mod core;
pub mod services;
pub mod transformer;

// Re-export commonly used types for convenience
pub use api::{AppState, ChatCompletionRequest, ModelList};
pub use core::{AppConfig, AppError, Result};
pub use services::{CopilotToken, TokenService};
