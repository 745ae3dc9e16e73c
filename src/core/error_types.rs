//! Shared constants for structured API errors.
//!
//! Two error envelope shapes exist: the HTTP envelope
//! (`{"error":{"code","message","details"}}`) used for responses rejected
//! before the stream opens, and the in-band stream envelope
//! (`{"error":{"message","type","code","param"}}`) used once the
//! `text/event-stream` headers have been sent.

pub const ERROR_TYPE_API: &str = "api_error";
pub const ERROR_TYPE_RATE_LIMIT: &str = "rate_limit_exceeded";
pub const ERROR_TYPE_INTERNAL: &str = "internal_error";

pub const ERROR_CODE_UNAUTHORIZED: &str = "unauthorized";
pub const ERROR_CODE_BAD_REQUEST: &str = "bad_request";
pub const ERROR_CODE_UPSTREAM_AUTH: &str = "upstream_auth_error";
pub const ERROR_CODE_UPSTREAM: &str = "upstream_error";
pub const ERROR_CODE_INTERNAL: &str = "internal_error";
