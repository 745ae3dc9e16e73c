//! Single-shot response to SSE translation.
//!
//! The reasoning model family answers with one complete JSON body even when
//! the caller asked for a stream. This module rewrites that single-shot shape
//! into the streaming delta shape and frames it as Server-Sent Events so
//! streaming clients see a well-formed event stream.

use serde_json::{json, Value};

/// Terminal SSE frame signalling stream completion.
pub const SSE_DONE_FRAME: &str = "data: [DONE]\n\n";

/// Rewrite single-shot `message` choices into streaming `delta` choices.
///
/// A response without a `choices` array (or with an empty one) is returned
/// unchanged. Choices that do not carry a `message` are dropped. All other
/// top-level fields are preserved.
pub fn delta_from_message_choices(mut data: Value) -> Value {
    let choices = match data.get("choices").and_then(Value::as_array) {
        Some(choices) if !choices.is_empty() => choices.clone(),
        _ => return data,
    };

    let mut converted: Vec<Value> = Vec::with_capacity(choices.len());

    for choice in choices {
        let message = match choice.get("message") {
            Some(message) => message,
            None => continue,
        };

        let mut rewritten = json!({
            "index": choice.get("index").cloned().unwrap_or(json!(0)),
            "delta": {"content": message.get("content").cloned().unwrap_or(Value::Null)},
        });
        if let Some(finish_reason) = choice.get("finish_reason") {
            rewritten["finish_reason"] = finish_reason.clone();
        }
        converted.push(rewritten);
    }

    data["choices"] = Value::Array(converted);
    data
}

/// Frame a completion response as a sequence of SSE events.
///
/// Each choice becomes one `data:` frame reusing the top-level `id`,
/// `created`, and `model` fields, in the order the choices appeared. A
/// response with no choices is emitted as a single frame containing the whole
/// body. The terminal `data: [DONE]` frame is always appended.
pub fn to_sse_events(data: &Value) -> Vec<String> {
    let mut events = Vec::new();

    match data.get("choices").and_then(Value::as_array) {
        Some(choices) if !choices.is_empty() => {
            let id = data.get("id").cloned().unwrap_or(json!(""));
            let created = data.get("created").cloned().unwrap_or(json!(0));
            let model = data.get("model").cloned().unwrap_or(json!(""));

            for choice in choices {
                let event = json!({
                    "id": id,
                    "created": created,
                    "model": model,
                    "choices": [choice],
                });
                events.push(format!("data: {}\n\n", event));
            }
        }
        // Malformed or empty responses are surfaced as-is rather than dropped
        _ => events.push(format!("data: {}\n\n", data)),
    }

    events.push(SSE_DONE_FRAME.to_string());
    events
}
