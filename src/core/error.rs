//! Error types and handling for the Copilot proxy server.
//!
//! This module provides a unified error type [`AppError`] that wraps various
//! error sources and implements proper HTTP response conversion. Errors that
//! occur after the response stream has opened are not handled here; the
//! streaming relay converts those into in-band JSON envelopes because the
//! status line can no longer be changed.

use crate::core::error_types::{
    ERROR_CODE_BAD_REQUEST, ERROR_CODE_INTERNAL, ERROR_CODE_UNAUTHORIZED, ERROR_CODE_UPSTREAM,
    ERROR_CODE_UPSTREAM_AUTH,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the application.
///
/// All errors in the application should be converted to this type for
/// consistent handling.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (file not found, parse errors, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// HTTP request errors from the reqwest client
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication/authorization failures
    #[error("{0}")]
    Unauthorized(String),

    /// Client provided invalid data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Exchanging the refresh credential for an access token failed.
    /// Fatal to the current request only; the next request retries.
    #[error("Failed to refresh token: {0}")]
    UpstreamAuth(String),

    /// Generic internal server errors with custom message
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error code used in the HTTP error envelope.
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => ERROR_CODE_UNAUTHORIZED,
            AppError::BadRequest(_) => ERROR_CODE_BAD_REQUEST,
            AppError::UpstreamAuth(_) => ERROR_CODE_UPSTREAM_AUTH,
            AppError::Request(_) => ERROR_CODE_UPSTREAM,
            _ => ERROR_CODE_INTERNAL,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Request(e) => {
                if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamAuth(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let code = self.code();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "details": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results using [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
