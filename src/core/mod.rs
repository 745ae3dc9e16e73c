//! Core functionality for the Copilot proxy server.
//!
//! This module contains fundamental components used throughout the application:
//! - Configuration management
//! - Error handling
//! - Metrics collection
//! - Request-scoped logging context

pub mod config;
pub mod error;
pub mod error_types;
pub mod logging;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use logging::{generate_request_id, get_request_id, REQUEST_ID};
pub use metrics::{get_metrics, init_metrics, Metrics};
