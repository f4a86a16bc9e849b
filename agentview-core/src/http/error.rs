//! Transport error types and HTTP error mapping

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Terminal errors for a turn: the request could not be completed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Network or connection error, including a body that broke off mid-stream
    #[error("Network error: {message}")]
    Network { message: String },

    /// The backend answered with a non-success status
    #[error("HTTP {status_code}: {message}")]
    Status { status_code: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid endpoint: {message}")]
    InvalidEndpoint { message: String },

    #[error("Failed to serialize request: {message}")]
    Serialization { message: String },

    #[error("Backend is unhealthy: {message}")]
    Unhealthy { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Network {
                message: format!("Connection failed: {}", err),
            }
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status_code: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            TransportError::Network {
                message: err.to_string(),
            }
        }
    }
}

/// Map a non-success status and optional body to a [`TransportError`]
pub fn map_http_error(status: StatusCode, body: Option<String>, request_id: Uuid) -> TransportError {
    let message = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_message(&v))
        .or_else(|| body.filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("HTTP error")
                .to_string()
        });

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => TransportError::Timeout,
        _ => TransportError::Status {
            status_code: status.as_u16(),
            message: format!("{} [request_id: {}]", message, request_id),
        },
    }
}

/// Extract a human-readable message from common JSON error shapes
fn extract_error_message(json: &Value) -> Option<String> {
    // FastAPI format: { "detail": "..." } or { "detail": [{ "msg": "..." }] }
    if let Some(detail) = json.get("detail") {
        if let Some(s) = detail.as_str() {
            return Some(s.to_string());
        }
        if let Some(msg) = detail
            .as_array()
            .and_then(|items| items.first())
            .and_then(|item| item.get("msg"))
            .and_then(|m| m.as_str())
        {
            return Some(msg.to_string());
        }
    }

    // { "error": { "message": "..." } }
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }

    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    json.get("error")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
