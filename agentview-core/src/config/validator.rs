//! Configuration validation utilities

use super::error::{FieldProblem, ValidationError};
use super::schema::ClientConfig;
use url::Url;

/// Configuration validator with rules beyond the schema's own checks
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a configuration with extended rules
    pub fn validate(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        // First run the built-in validation
        config.validate()?;

        self.validate_base_url(config)?;
        self.validate_paths(config)?;
        self.validate_timeouts(config)?;

        Ok(())
    }

    fn validate_base_url(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        let invalid = |reason: String| {
            ValidationError::new("endpoint.base_url", FieldProblem::InvalidUrl { reason })
        };

        let url = Url::parse(&config.endpoint.base_url)
            .map_err(|e| invalid(format!("does not parse: {}", e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!("must use http or https, not {}", url.scheme())));
        }

        Ok(())
    }

    fn validate_paths(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        for (field, path) in [
            ("endpoint.chat_path", &config.endpoint.chat_path),
            ("endpoint.health_path", &config.endpoint.health_path),
        ] {
            if !path.starts_with('/') {
                return Err(ValidationError::new(
                    field,
                    FieldProblem::RelativePath { path: path.clone() },
                ));
            }
        }
        Ok(())
    }

    fn validate_timeouts(&self, config: &ClientConfig) -> Result<(), ValidationError> {
        if config.endpoint.connect_timeout_secs == 0 {
            return Err(ValidationError::new(
                "endpoint.connect_timeout_secs",
                FieldProblem::ZeroTimeout,
            ));
        }
        if config.endpoint.request_timeout_secs == Some(0) {
            return Err(ValidationError::new(
                "endpoint.request_timeout_secs",
                FieldProblem::ZeroTimeout,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_scheme() {
        let config = ClientConfig::for_base_url("ftp://example.com");
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field, "endpoint.base_url");
        assert!(matches!(err.problem, FieldProblem::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_relative_chat_path() {
        let mut config = ClientConfig::for_base_url("http://localhost:8000");
        config.endpoint.chat_path = "chat".to_string();
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field, "endpoint.chat_path");
        assert_eq!(
            err.problem,
            FieldProblem::RelativePath {
                path: "chat".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = ClientConfig::for_base_url("http://localhost:8000");
        config.endpoint.request_timeout_secs = Some(0);
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field, "endpoint.request_timeout_secs");
        assert_eq!(err.problem, FieldProblem::ZeroTimeout);
    }
}
