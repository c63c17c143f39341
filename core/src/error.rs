//! Normalized error type for the storefront API client.
//!
//! # Design
//! Every failure that leaves the client is an `ApiError { code, message }`.
//! Raw failures arrive as JSON values of unknown shape (an error body merged
//! with the response status, or a synthesized transport failure). `normalize`
//! narrows such a value against a small closed set of known shapes, tried in
//! priority order, and falls back to a generic error when none match. It
//! never fails itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Code used when a failure carries no usable code of its own.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Code used when no HTTP response was received at all.
pub const NETWORK_ERROR_CODE: &str = "0";

const REQUEST_FAILED: &str = "Request failed";
const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// The uniform error shape seen by everything above the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the request never reached the server.
    pub fn is_network(&self) -> bool {
        self.code == NETWORK_ERROR_CODE
    }
}

/// Known failure shapes. `serde(untagged)` tries the variants in declaration
/// order, so the first shape that fits wins.
#[derive(Deserialize)]
#[serde(untagged)]
enum FailureShape {
    /// Carries both `status` and `statusText`.
    HttpStatus {
        status: Value,
        #[serde(rename = "statusText")]
        status_text: Value,
        #[serde(default)]
        error: Option<Value>,
        #[serde(default)]
        message: Option<Value>,
    },
    /// Carries a `message` and maybe an `error` code.
    MessageBearing {
        message: Value,
        #[serde(default)]
        error: Option<Value>,
    },
}

/// Convert an arbitrary failure value into an `ApiError`.
///
/// - `{status, statusText, ..}`: `code` is the stringified status. `message`
///   prefers a server-provided `error` string, then the status text, then a
///   `message` string, then `"Request failed"`.
/// - `{message, error?}`: `code` is `error` when it is a string, else
///   `UNKNOWN_ERROR`; `message` is the stringified `message`.
/// - anything else: `UNKNOWN_ERROR` with a generic message.
pub fn normalize(value: &Value) -> ApiError {
    match FailureShape::deserialize(value) {
        Ok(FailureShape::HttpStatus {
            status,
            status_text,
            error,
            message,
        }) => {
            let message = non_empty_str(error.as_ref())
                .or_else(|| non_empty_str(Some(&status_text)))
                .or_else(|| non_empty_str(message.as_ref()))
                .unwrap_or(REQUEST_FAILED);
            ApiError::new(stringify(&status), message)
        }
        Ok(FailureShape::MessageBearing { message, error }) => {
            let code = match error {
                Some(Value::String(code)) => code,
                _ => UNKNOWN_ERROR.to_string(),
            };
            ApiError::new(code, stringify(&message))
        }
        Err(_) => ApiError::new(UNKNOWN_ERROR, UNEXPECTED_ERROR),
    }
}

/// Convert a Rust error that escaped without a structured payload.
pub fn normalize_error(err: &dyn std::error::Error) -> ApiError {
    let message = err.to_string();
    if message.is_empty() {
        return ApiError::new(UNKNOWN_ERROR, UNEXPECTED_ERROR);
    }
    ApiError::new(UNKNOWN_ERROR, message)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
