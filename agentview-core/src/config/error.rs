//! Errors from loading a client configuration

use std::path::PathBuf;
use thiserror::Error;

/// Why a client configuration could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read client config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse client config {}{}: {message}", .path.display(), location(.line, .column))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("client config {} has unsupported extension {extension:?}; use .yaml, .yml or .json", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("client config references ${{{var}}} but it is not set")]
    EnvVarNotFound { var: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(line), Some(column)) => format!(" (line {line}, column {column})"),
        (Some(line), None) => format!(" (line {line})"),
        _ => String::new(),
    }
}

/// A config field whose value cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {problem}")]
pub struct ValidationError {
    /// Dotted path of the field, e.g. `endpoint.base_url`
    pub field: &'static str,
    pub problem: FieldProblem,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldProblem {
    #[error("must not be empty")]
    Empty,

    #[error("version {found:?} is not supported, expected {expected:?}")]
    UnsupportedVersion {
        expected: &'static str,
        found: String,
    },

    #[error("backend URL {reason}")]
    InvalidUrl { reason: String },

    #[error("path {path:?} must start with '/'")]
    RelativePath { path: String },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

impl ValidationError {
    pub fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }

    pub fn empty(field: &'static str) -> Self {
        Self::new(field, FieldProblem::Empty)
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_includes_location() {
        let err = ConfigError::Parse {
            path: PathBuf::from("client.yaml"),
            line: Some(3),
            column: Some(7),
            message: "unexpected key".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot parse client config client.yaml (line 3, column 7): unexpected key"
        );
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = ConfigError::from(ValidationError::new(
            "endpoint.chat_path",
            FieldProblem::RelativePath {
                path: "chat".to_string(),
            },
        ));
        assert_eq!(
            err.to_string(),
            "invalid `endpoint.chat_path`: path \"chat\" must start with '/'"
        );
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = ConfigError::EnvVarNotFound {
            var: "AGENT_URL".to_string(),
        };
        assert_eq!(err.to_string(), "client config references ${AGENT_URL} but it is not set");
    }
}
