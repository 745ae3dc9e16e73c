//! Streaming relay between the caller and the upstream completions endpoint.
//!
//! The relay always answers HTTP 200 with a `text/event-stream` body. Any
//! failure after that point (token refresh, upstream status, mid-stream
//! transport errors) is delivered in-band as a single JSON error envelope and
//! the stream terminates; none of the terminal states resume.

use crate::api::handlers::AppState;
use crate::api::models::{ChatCompletionRequest, StreamErrorDetail, StreamErrorResponse};
use crate::core::error_types::{ERROR_TYPE_API, ERROR_TYPE_INTERNAL, ERROR_TYPE_RATE_LIMIT};
use crate::core::logging::get_request_id;
use crate::transformer::{delta_from_message_choices, to_sse_events, REASONING_MODEL_PREFIX};
use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use futures::StreamExt;
use std::sync::Arc;

/// Upstream chat completions endpoint. Fixed; not configurable.
pub const COMPLETIONS_URL: &str = "https://api.individual.githubcopilot.com/chat/completions";

/// Client identification header value required by the completions endpoint.
pub const EDITOR_VERSION: &str = "vscode/1.95.3";

/// Build the single in-band error envelope emitted on an open stream.
fn stream_error_payload(message: String, kind: &str) -> Bytes {
    let envelope = StreamErrorResponse {
        error: StreamErrorDetail {
            message,
            error_type: kind.to_string(),
            code: kind.to_string(),
            param: None,
        },
    };
    Bytes::from(
        serde_json::to_vec(&envelope)
            .unwrap_or_else(|_| br#"{"error":{"message":"internal error"}}"#.to_vec()),
    )
}

/// Relay a normalized chat completion request to the upstream and stream the
/// result back to the caller.
///
/// Success cases either forward the upstream byte stream verbatim or, for
/// reasoning models that only answer single-shot, synthesize SSE frames from
/// the complete JSON body. Dropping the returned response (caller disconnect)
/// drops the producer and with it the upstream connection.
pub fn relay_chat_completion(state: Arc<AppState>, payload: ChatCompletionRequest) -> Response {
    let model = payload.model.clone().unwrap_or_default();
    let is_streaming = payload.stream.unwrap_or(false);
    // The body is polled outside the handler's task-local scope, so pin the
    // request ID here.
    let request_id = get_request_id();

    let stream = async_stream::stream! {
        let token = match state.token_service.get_valid_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Token acquisition failed");
                yield Ok::<Bytes, std::io::Error>(stream_error_payload(e.to_string(), ERROR_TYPE_INTERNAL));
                return;
            }
        };

        let response = match state
            .http_client
            .post(&state.completions_url)
            .header("Authorization", format!("Bearer {}", token.token))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .header("editor-version", EDITOR_VERSION)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, model = %model, error = %e, "Upstream request failed");
                yield Ok(stream_error_payload(e.to_string(), ERROR_TYPE_INTERNAL));
                return;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_message = response.text().await.unwrap_or_else(|e| e.to_string());
            tracing::error!(
                request_id = %request_id,
                model = %model,
                status = %status,
                body = %error_message,
                "Upstream API error"
            );
            let kind = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                ERROR_TYPE_RATE_LIMIT
            } else {
                ERROR_TYPE_API
            };
            yield Ok(stream_error_payload(error_message, kind));
            return;
        }

        if model.starts_with(REASONING_MODEL_PREFIX) && is_streaming {
            // Reasoning models answer single-shot; synthesize the stream.
            match response.json::<serde_json::Value>().await {
                Ok(data) => {
                    let converted = delta_from_message_choices(data);
                    for event in to_sse_events(&converted) {
                        yield Ok(Bytes::from(event));
                    }
                }
                Err(e) => {
                    tracing::error!(request_id = %request_id, model = %model, error = %e, "Failed to read upstream body");
                    yield Ok(stream_error_payload(e.to_string(), ERROR_TYPE_INTERNAL));
                }
            }
            return;
        }

        let mut byte_stream = response.bytes_stream();
        while let Some(chunk) = byte_stream.next().await {
            match chunk {
                Ok(bytes) => yield Ok(bytes),
                Err(e) => {
                    tracing::error!(request_id = %request_id, model = %model, error = %e, "Stream error");
                    yield Ok(stream_error_payload(e.to_string(), ERROR_TYPE_INTERNAL));
                    return;
                }
            }
        }
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/event-stream")
        .header("Cache-Control", "no-cache")
        .header("Connection", "keep-alive")
        .body(Body::from_stream(stream))
        .unwrap()
}
