//! API request and response models.
//!
//! This module defines the data structures used on the caller-facing API:
//! chat completion requests, model listings, and the two error envelope
//! shapes (pre-stream HTTP errors and in-band stream errors).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat completion request following the OpenAI API format.
///
/// Only the fields the proxy inspects are modeled explicitly; everything else
/// is captured in `extra` and forwarded upstream unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// Conversation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,

    /// Additional fields passed through to the upstream unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content, either a plain string or an array of content parts
    pub content: MessageContent,

    /// Additional message fields passed through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Message content in either of the wire shapes the API accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain string content
    Text(String),

    /// Structured content parts (flattened during request normalization)
    Parts(Vec<ContentPart>),

    /// Anything else (null, objects); kept as-is and forwarded unchanged
    Other(Value),
}

/// A single entry in a structured content array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part type; only "text" is supported
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,

    /// Text payload for "text" parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Model information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    pub permission: Vec<Value>,
}

/// List of available models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error envelope delivered in-band on an already-open response stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamErrorResponse {
    pub error: StreamErrorDetail,
}

/// Error detail in stream error envelopes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    pub code: String,
    pub param: Option<String>,
}
