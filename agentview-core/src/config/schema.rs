//! Configuration schema structures with serde support

use super::error::{FieldProblem, ValidationError};
use serde::{Deserialize, Serialize};

/// Schema version understood by this crate
pub const CONFIG_VERSION: &str = "0.1";

/// Message shown in place of the agent's answer when a turn fails
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Sorry, something went wrong. Please check if the backend is running.";

/// Root client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Schema version (required - no default)
    pub version: String,

    /// Backend endpoint
    pub endpoint: EndpointConfig,

    /// Identity sent with each request
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Rendering capabilities
    #[serde(default)]
    pub render: RenderConfig,

    /// User-facing failure text
    #[serde(default = "default_error_message")]
    pub error_message: String,
}

/// Backend endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Origin of the backend, e.g. `http://localhost:8000`
    pub base_url: String,

    /// Path of the streaming chat endpoint
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the health endpoint
    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overall request timeout; unset means the stream may run indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Identity fields the backend uses to scope its conversation state
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default = "default_session_id")]
    pub session_id: String,
}

/// Which rendering capabilities are enabled
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_true")]
    pub markdown: bool,

    #[serde(default = "default_true")]
    pub sanitize: bool,

    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            session_id: default_session_id(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            markdown: true,
            sanitize: true,
            charts: true,
        }
    }
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            chat_path: default_chat_path(),
            health_path: default_health_path(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Default configuration for a backend at `base_url`
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            endpoint: EndpointConfig::new(base_url),
            identity: IdentityConfig::default(),
            render: RenderConfig::default(),
            error_message: default_error_message(),
        }
    }

    /// Structural validation that needs no external lookups
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.version != CONFIG_VERSION {
            return Err(ValidationError::new(
                "version",
                FieldProblem::UnsupportedVersion {
                    expected: CONFIG_VERSION,
                    found: self.version.clone(),
                },
            ));
        }

        if self.endpoint.base_url.trim().is_empty() {
            return Err(ValidationError::empty("endpoint.base_url"));
        }

        if self.identity.user_id.is_empty() {
            return Err(ValidationError::empty("identity.user_id"));
        }

        if self.identity.session_id.is_empty() {
            return Err(ValidationError::empty("identity.session_id"));
        }

        if self.error_message.trim().is_empty() {
            return Err(ValidationError::empty("error_message"));
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_health_path() -> String {
    "/health".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("agentview/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_user_id() -> String {
    "default_user".to_string()
}

fn default_session_id() -> String {
    "default_session".to_string()
}

fn default_error_message() -> String {
    DEFAULT_ERROR_MESSAGE.to_string()
}
