//! HTTP request handlers for the Copilot proxy API.
//!
//! This module contains all endpoint handlers: model listing, chat
//! completions, health check, and metrics.

use crate::api::auth::verify_auth;
use crate::api::models::{ChatCompletionRequest, HealthResponse, ModelInfo, ModelList};
use crate::api::streaming::{relay_chat_completion, COMPLETIONS_URL};
use crate::core::config::AppConfig;
use crate::core::logging::{generate_request_id, REQUEST_ID};
use crate::core::metrics::get_metrics;
use crate::core::{AppError, Result};
use crate::services::TokenService;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use prometheus::{Encoder, TextEncoder};
use std::collections::HashSet;
use std::sync::Arc;

/// Model identifiers served by the upstream, with fixed metadata.
const SUPPORTED_MODELS: &[&str] = &["o1", "o1-preview", "o1-mini", "gpt-4o", "claude-3.5-sonnet"];

const MODEL_CREATED: i64 = 1687882411;

/// Shared application state.
pub struct AppState {
    pub config: AppConfig,
    pub auth_tokens: HashSet<String>,
    pub token_service: TokenService,
    pub http_client: reqwest::Client,
    pub completions_url: String,
}

impl AppState {
    /// Build the application state against the fixed production endpoints.
    pub fn new(config: AppConfig, http_client: reqwest::Client) -> Self {
        let auth_tokens = config.auth_tokens.iter().cloned().collect();
        let token_service = TokenService::new(config.refresh_token.clone());
        Self {
            config,
            auth_tokens,
            token_service,
            http_client,
            completions_url: COMPLETIONS_URL.to_string(),
        }
    }
}

/// List available models.
#[tracing::instrument(skip(state, headers))]
pub async fn list_models(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ModelList>> {
    let request_id = generate_request_id();

    REQUEST_ID
        .scope(request_id.clone(), async move {
            let metrics = get_metrics();
            if let Err(e) = verify_auth(&headers, &state.auth_tokens) {
                metrics
                    .request_count
                    .with_label_values(&["GET", "/models", "", "401"])
                    .inc();
                return Err(e);
            }

            tracing::debug!(request_id = %request_id, "Listing available models");

            let data = SUPPORTED_MODELS
                .iter()
                .map(|id| ModelInfo {
                    id: (*id).to_string(),
                    object: "model".to_string(),
                    created: MODEL_CREATED,
                    owned_by: "github-copilot".to_string(),
                    permission: vec![],
                })
                .collect();

            metrics
                .request_count
                .with_label_values(&["GET", "/models", "", "200"])
                .inc();

            Ok(Json(ModelList {
                object: "list".to_string(),
                data,
            }))
        })
        .await
}

/// Handle chat completion requests.
///
/// The request body is normalized, a valid upstream token is obtained, and
/// the upstream reply is streamed back. Once the stream opens the response is
/// always HTTP 200; later failures arrive in-band.
#[tracing::instrument(
    skip(state, headers, payload),
    fields(
        model = payload.model.as_deref().unwrap_or(""),
        stream = payload.stream.unwrap_or(false),
    )
)]
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ChatCompletionRequest>,
) -> Result<Response> {
    let request_id = generate_request_id();

    REQUEST_ID
        .scope(request_id.clone(), async move {
            let metrics = get_metrics();
            let model = payload.model.clone().unwrap_or_default();

            if let Err(e) = verify_auth(&headers, &state.auth_tokens) {
                metrics
                    .request_count
                    .with_label_values(&["POST", "/chat/completions", &model, "401"])
                    .inc();
                return Err(e);
            }

            tracing::info!(
                request_id = %request_id,
                model = %model,
                stream = payload.stream.unwrap_or(false),
                "Received chat completion request"
            );

            let timer = metrics
                .request_duration
                .with_label_values(&["POST", "/chat/completions", &model])
                .start_timer();

            let normalized = match crate::transformer::normalize_request(payload) {
                Ok(normalized) => normalized,
                Err(e) => {
                    tracing::warn!(request_id = %request_id, model = %model, error = %e, "Request rejected");
                    metrics
                        .request_count
                        .with_label_values(&["POST", "/chat/completions", &model, "400"])
                        .inc();
                    return Err(e);
                }
            };

            let response = relay_chat_completion(state.clone(), normalized);

            metrics
                .request_count
                .with_label_values(&["POST", "/chat/completions", &model, "200"])
                .inc();
            // Time to stream start; the body itself is produced lazily
            timer.observe_duration();

            Ok(response)
        })
        .await
}

/// Basic health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Prometheus metrics endpoint.
pub async fn metrics_handler() -> Result<Response> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", encoder.format_type())
        .body(buffer.into())
        .unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let response = health().await;
        assert_eq!(response.0.status, "ok");
    }

    #[tokio::test]
    async fn test_metrics_handler_encodes() {
        crate::core::init_metrics();
        let response = metrics_handler().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_supported_models_include_reasoning_family() {
        assert!(SUPPORTED_MODELS.contains(&"o1"));
        assert!(SUPPORTED_MODELS.contains(&"o1-mini"));
        assert!(SUPPORTED_MODELS.contains(&"gpt-4o"));
    }

    #[test]
    fn test_app_state_builds_allow_list() {
        let config = AppConfig {
            refresh_token: "gho_x".to_string(),
            host: "127.0.0.1".to_string(),
            port: 9191,
            auth_tokens: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            request_timeout_secs: 300,
        };
        let state = AppState::new(config, reqwest::Client::new());
        assert_eq!(state.auth_tokens.len(), 2);
        assert_eq!(state.completions_url, COMPLETIONS_URL);
    }
}
