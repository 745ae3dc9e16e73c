//! Upstream access token lifecycle management.
//!
//! The proxy holds a single long-lived GitHub credential and exchanges it for
//! short-lived Copilot access tokens. This module caches the current token
//! and refreshes it just-in-time, sharing one valid credential across all
//! in-flight requests.

use crate::core::error::{AppError, Result};
use crate::core::metrics::get_metrics;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Token exchange endpoint. Fixed; not configurable.
pub const TOKEN_URL: &str = "https://api.github.com/copilot_internal/v2/token";

/// A token is considered usable only while its expiry is more than this many
/// seconds in the future.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Client identification header value required by the token endpoint.
const EDITOR_VERSION: &str = "vscode/1.96.1";

/// A short-lived upstream access token.
///
/// Replaced wholesale on refresh, never mutated in place, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct CopilotToken {
    /// Opaque bearer string for upstream calls
    pub token: String,

    /// Absolute expiry, seconds since the unix epoch
    pub expires_at: i64,
}

impl CopilotToken {
    /// Whether this token is still usable at `now` with the safety margin.
    fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at > now + TOKEN_EXPIRY_MARGIN_SECS
    }
}

/// Caches the current upstream token and refreshes it on demand.
pub struct TokenService {
    refresh_token: String,
    token_url: String,
    // Refresh uses the platform-default client timeout rather than the long
    // completions timeout, so it gets its own client.
    http_client: reqwest::Client,
    cached: Mutex<Option<CopilotToken>>,
}

impl TokenService {
    /// Create a token service using the fixed production endpoint.
    pub fn new(refresh_token: String) -> Self {
        Self::with_endpoint(refresh_token, TOKEN_URL.to_string())
    }

    /// Create a token service against a specific token endpoint.
    pub fn with_endpoint(refresh_token: String, token_url: String) -> Self {
        Self {
            refresh_token,
            token_url,
            http_client: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    /// Return a currently valid access token, refreshing it if needed.
    ///
    /// Callable concurrently from any number of in-flight requests. The cache
    /// lock is held across the refresh exchange, so concurrent callers that
    /// miss the fast path wait for a single in-flight refresh instead of
    /// issuing redundant ones, and a caller can never observe a torn token.
    /// On the fast path no network call is made.
    ///
    /// A refresh failure propagates to the caller and leaves any previously
    /// cached token untouched.
    pub async fn get_valid_token(&self) -> Result<CopilotToken> {
        let mut cached = self.cached.lock().await;
        let now = now_unix();

        if let Some(token) = cached.as_ref() {
            tracing::debug!(
                expires_at = token.expires_at,
                now = now,
                "Checking cached token"
            );
            if token.is_valid_at(now) {
                tracing::debug!("Using cached token");
                return Ok(token.clone());
            }
        }

        tracing::info!("Token expired or not found, refreshing...");
        let token = self.refresh().await?;
        tracing::info!(
            expires_at = token.expires_at,
            "Token refreshed successfully"
        );

        *cached = Some(token.clone());
        Ok(token)
    }

    /// Exchange the long-lived refresh credential for a new access token.
    ///
    /// A single network call; retry policy is the caller's responsibility.
    async fn refresh(&self) -> Result<CopilotToken> {
        tracing::debug!(url = %self.token_url, "Attempting to refresh token");
        let metrics = get_metrics();

        let response = self
            .http_client
            .get(&self.token_url)
            .header("Authorization", format!("token {}", self.refresh_token))
            .header("editor-version", EDITOR_VERSION)
            .send()
            .await
            .map_err(|e| {
                metrics.token_refresh_count.with_label_values(&["failure"]).inc();
                tracing::error!(error = %e, "Token refresh transport error");
                AppError::UpstreamAuth(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            metrics.token_refresh_count.with_label_values(&["failure"]).inc();
            tracing::error!(status = %status, body = %body, "Token refresh rejected");
            return Err(AppError::UpstreamAuth(format!("{} {}", status.as_u16(), body)));
        }

        let token: CopilotToken = response.json().await.map_err(|e| {
            metrics.token_refresh_count.with_label_values(&["failure"]).inc();
            tracing::error!(error = %e, "Token refresh returned malformed body");
            AppError::UpstreamAuth(e.to_string())
        })?;

        metrics.token_refresh_count.with_label_values(&["success"]).inc();
        Ok(token)
    }
}

/// Current unix time in seconds.
fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
