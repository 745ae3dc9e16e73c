//! Caller authentication.
//!
//! Requests carry an `Authorization: Bearer <token>` header whose token must
//! be a member of the allow-list loaded at startup. Anything else is rejected
//! with HTTP 401 before any upstream call is made.

use axum::http::HeaderMap;
use std::collections::HashSet;

use crate::core::error::{AppError, Result};

/// Verify the caller's bearer token against the configured allow-list.
///
/// Returns the accepted token on success.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] when the header is missing, not of the
/// form `Bearer <token>` (exactly two parts, case-insensitive scheme), or the
/// token is not in the allow-list.
pub fn verify_auth(headers: &HeaderMap, allowed_tokens: &HashSet<String>) -> Result<String> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized(
                "No authorization header or api key found in request.".to_string(),
            )
        })?;

    let parts: Vec<&str> = auth_header.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ));
    }

    let (scheme, token) = (parts[0], parts[1]);
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::Unauthorized(
            "Invalid authorization type".to_string(),
        ));
    }

    if !allowed_tokens.contains(token) {
        return Err(AppError::Unauthorized(
            "Invalid authorization token".to_string(),
        ));
    }

    Ok(token.to_string())
}
