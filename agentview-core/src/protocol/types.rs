//! Core protocol types for agent chat streams
//!
//! The backend answers a single POST with a line-oriented stream. Each
//! meaningful line is `data: ` followed by one JSON object:
//! - `{"text": "..."}` for an incremental piece of the answer
//! - `{"thought": {"tool": "...", "input": ...}}` for a tool invocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound request body for one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Caller identity used by the backend to scope sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Conversation identity on the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Create a request carrying only the message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: None,
            session_id: None,
        }
    }

    /// Attach backend identity fields
    pub fn with_identity(mut self, user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.session_id = Some(session_id.into());
        self
    }
}

/// Raw JSON object found after the `data: ` prefix.
///
/// Every field is optional so that unknown shapes decode successfully and
/// are dropped by the classifier instead of failing the line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamPayload {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub thought: Option<ThoughtPayload>,
}

/// Body of a `thought` record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThoughtPayload {
    #[serde(default)]
    pub tool: String,

    #[serde(default)]
    pub input: ToolInput,
}

/// Input handed to a tool: either a plain string or any JSON value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolInput {
    Text(String),
    Structured(Value),
}

impl Default for ToolInput {
    fn default() -> Self {
        ToolInput::Structured(Value::Null)
    }
}

impl ToolInput {
    /// String rendering for display: strings verbatim, anything else as compact JSON
    pub fn render(&self) -> String {
        match self {
            ToolInput::Text(s) => s.clone(),
            ToolInput::Structured(Value::Null) => String::new(),
            ToolInput::Structured(v) => v.to_string(),
        }
    }

    /// Structured value, if the input was not a plain string
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ToolInput::Structured(v) => Some(v),
            ToolInput::Text(_) => None,
        }
    }
}

/// A classified stream event
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolEvent {
    /// Incremental answer text, appended in arrival order
    TextDelta { text: String },
    /// A tool invocation record
    ThoughtStep { tool: String, input: ToolInput },
}

/// A thought step as stored in a turn's log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThoughtStep {
    /// Position in arrival order, starting at 0
    pub seq: usize,

    /// Tool name as sent by the backend
    pub tool: String,

    /// Tool input, kept verbatim
    pub input: ToolInput,

    /// When the step was applied
    pub received_at: DateTime<Utc>,
}

impl ThoughtStep {
    /// Display form of the input
    pub fn input_text(&self) -> String {
        self.input.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization_omits_missing_identity() {
        let body = serde_json::to_value(ChatRequest::new("hi")).unwrap();
        assert_eq!(body, json!({"message": "hi"}));

        let body = serde_json::to_value(ChatRequest::new("hi").with_identity("u", "s")).unwrap();
        assert_eq!(body, json!({"message": "hi", "user_id": "u", "session_id": "s"}));
    }

    #[test]
    fn test_tool_input_variants() {
        let text: ToolInput = serde_json::from_value(json!("select 1")).unwrap();
        assert_eq!(text, ToolInput::Text("select 1".to_string()));
        assert_eq!(text.render(), "select 1");
        assert!(text.as_value().is_none());

        let structured: ToolInput = serde_json::from_value(json!({"q": "weather"})).unwrap();
        assert_eq!(structured.render(), r#"{"q":"weather"}"#);
        assert_eq!(structured.as_value(), Some(&json!({"q": "weather"})));
    }

    #[test]
    fn test_payload_ignores_unknown_fields() {
        let payload: StreamPayload = serde_json::from_str(r#"{"usage": {"tokens": 3}}"#).unwrap();
        assert!(payload.text.is_none());
        assert!(payload.thought.is_none());
    }

    #[test]
    fn test_thought_without_input() {
        let payload: StreamPayload = serde_json::from_str(r#"{"thought": {"tool": "list_tables"}}"#).unwrap();
        let thought = payload.thought.unwrap();
        assert_eq!(thought.tool, "list_tables");
        assert_eq!(thought.input.render(), "");
    }
}
