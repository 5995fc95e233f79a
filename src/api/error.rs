//! API error types for calls against the clinic backend.

use serde_json::Value;

/// Failure of a single API call.
///
/// The UI makes no distinction between these beyond the text shown; the
/// variants exist so callers can log precisely.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{}", status_text(.status, .message))]
    Status { status: u16, message: Option<String> },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

fn status_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(msg) => msg.to_string(),
        None => format!("Request failed with status {status}"),
    }
}

impl ApiError {
    /// Build a status error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"msg": "..."}`; anything else
    /// yields no server message.
    pub fn from_status(status: u16, body: &Value) -> Self {
        let message = body
            .get("msg")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string);
        ApiError::Status { status, message }
    }

    /// Text the server supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Server message, or `fallback` when the server gave none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
