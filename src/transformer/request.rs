//! Inbound request normalization.
//!
//! The upstream completions endpoint only accepts plain-string message
//! content, and its reasoning model family rejects system messages. This
//! module rewrites inbound OpenAI-shaped requests into that dialect before
//! they are relayed.

use crate::api::models::{ChatCompletionRequest, Message, MessageContent};
use crate::core::error::{AppError, Result};
use serde_json::Map;

/// Model name prefix for the reasoning model family. These models reject
/// system messages and only serve single-shot completions.
pub const REASONING_MODEL_PREFIX: &str = "o1";

/// Normalize an inbound chat completion request for the upstream.
///
/// Messages whose `content` is an array of parts are expanded so that each
/// part becomes its own message with the same role. A part whose type is not
/// `"text"` rejects the whole request. For reasoning models, system roles are
/// rewritten to user roles. All other fields pass through unchanged.
pub fn normalize_request(request: ChatCompletionRequest) -> Result<ChatCompletionRequest> {
    let messages = match request.messages {
        Some(ref messages) if !messages.is_empty() => messages.clone(),
        _ => return Ok(request),
    };

    let mut processed: Vec<Message> = Vec::with_capacity(messages.len());

    for message in messages {
        match message.content {
            MessageContent::Parts(parts) => {
                for part in parts {
                    if part.part_type.as_deref() != Some("text") {
                        return Err(AppError::BadRequest(
                            "Only text type is supported in content array".to_string(),
                        ));
                    }
                    let text = part.text.ok_or_else(|| {
                        AppError::BadRequest(
                            "Text content part is missing its text field".to_string(),
                        )
                    })?;
                    processed.push(Message {
                        role: message.role.clone(),
                        content: MessageContent::Text(text),
                        extra: Map::new(),
                    });
                }
            }
            // An array that did not parse as content parts contains entries
            // that cannot all be text parts; reject it the same way
            MessageContent::Other(serde_json::Value::Array(_)) => {
                return Err(AppError::BadRequest(
                    "Only text type is supported in content array".to_string(),
                ));
            }
            // Non-array content is kept as-is, including any extra fields
            _ => processed.push(message),
        }
    }

    let is_reasoning_model = request
        .model
        .as_deref()
        .map_or(false, |m| m.starts_with(REASONING_MODEL_PREFIX));

    if is_reasoning_model {
        for message in &mut processed {
            if message.role == "system" {
                message.role = "user".to_string();
            }
        }
    }

    Ok(ChatCompletionRequest {
        messages: Some(processed),
        ..request
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request_from(value: serde_json::Value) -> ChatCompletionRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_messages_unchanged() {
        let request = request_from(json!({"model": "gpt-4o"}));
        let normalized = normalize_request(request).unwrap();
        assert!(normalized.messages.is_none());
        assert_eq!(normalized.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_empty_messages_unchanged() {
        let request = request_from(json!({"model": "gpt-4o", "messages": []}));
        let normalized = normalize_request(request).unwrap();
        assert_eq!(normalized.messages.unwrap().len(), 0);
    }

    #[test]
    fn test_string_content_kept_as_is() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": "hi", "name": "alice"}]
        }));

        let normalized = normalize_request(request).unwrap();
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(
            value["messages"],
            json!([{"role": "user", "content": "hi", "name": "alice"}])
        );
    }

    #[test]
    fn test_array_content_expanded_into_messages() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "stream": true,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "first"},
                    {"type": "text", "text": "second"}
                ]
            }]
        }));

        let normalized = normalize_request(request).unwrap();
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(
            value["messages"],
            json!([
                {"role": "user", "content": "first"},
                {"role": "user", "content": "second"}
            ])
        );
        // Other top-level fields survive
        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["stream"], true);
    }

    #[test]
    fn test_non_text_part_rejected() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{
                "role": "user",
                "content": [{"type": "image", "image_url": {"url": "http://x"}}]
            }]
        }));

        let err = normalize_request(request).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_part_missing_type_rejected() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": [{"text": "hi"}]}]
        }));

        let err = normalize_request(request).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_array_with_non_part_entries_rejected() {
        for content in [json!(["plain string"]), json!([{"type": 5}])] {
            let request = request_from(json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": content}]
            }));

            let err = normalize_request(request).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }

    #[test]
    fn test_text_part_missing_text_rejected() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{"role": "user", "content": [{"type": "text"}]}]
        }));

        let err = normalize_request(request).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_reasoning_model_rewrites_system_roles() {
        let request = request_from(json!({
            "model": "o1-mini",
            "messages": [
                {"role": "system", "content": "You are terse."},
                {"role": "user", "content": [{"type": "text", "text": "hi"}]}
            ]
        }));

        let normalized = normalize_request(request).unwrap();
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(
            value["messages"],
            json!([
                {"role": "user", "content": "You are terse."},
                {"role": "user", "content": "hi"}
            ])
        );
    }

    #[test]
    fn test_non_reasoning_model_keeps_system_roles() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{"role": "system", "content": "You are terse."}]
        }));

        let normalized = normalize_request(request).unwrap();
        assert_eq!(normalized.messages.unwrap()[0].role, "system");
    }

    #[test]
    fn test_null_content_kept_as_is() {
        let request = request_from(json!({
            "model": "gpt-4o",
            "messages": [{"role": "assistant", "content": null}]
        }));

        let normalized = normalize_request(request).unwrap();
        let value = serde_json::to_value(&normalized).unwrap();
        assert_eq!(
            value["messages"],
            json!([{"role": "assistant", "content": null}])
        );
    }

    #[test]
    fn test_normalization_idempotent() {
        let request = request_from(json!({
            "model": "o1",
            "messages": [
                {"role": "system", "content": "rules"},
                {"role": "user", "content": [{"type": "text", "text": "hi"}]}
            ]
        }));

        let once = normalize_request(request).unwrap();
        let twice = normalize_request(once.clone()).unwrap();
        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }
}
