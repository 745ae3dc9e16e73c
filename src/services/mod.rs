//! Business logic services for the Copilot proxy.
//!
//! This module contains the service layer components that implement core
//! business logic, currently the upstream token lifecycle.

pub mod token_service;

// Re-export commonly used types
pub use token_service::{CopilotToken, TokenService};
