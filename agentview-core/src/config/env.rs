//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::{Captures, Regex};
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
    })
}

/// Replace every `${VAR}` with its value from the environment.
///
/// The first variable that is not set is reported as an error.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut missing: Option<String> = None;

    let result = env_var_pattern().replace_all(content, |cap: &Captures<'_>| {
        let var_name = &cap[1];
        match env::var(var_name) {
            Ok(value) => value,
            Err(_) => {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(var) => Err(ConfigError::EnvVarNotFound { var }),
        None => Ok(result.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_env_vars() {
        env::set_var("AGENTVIEW_TEST_HOST", "localhost:9000");

        let content = "base_url: http://${AGENTVIEW_TEST_HOST}";
        let result = interpolate_env_vars(content).unwrap();
        assert_eq!(result, "base_url: http://localhost:9000");

        env::remove_var("AGENTVIEW_TEST_HOST");
    }

    #[test]
    fn test_missing_env_var() {
        let content = "session_id: ${AGENTVIEW_MISSING_VAR}";
        let result = interpolate_env_vars(content);

        if let Err(ConfigError::EnvVarNotFound { var }) = result {
            assert_eq!(var, "AGENTVIEW_MISSING_VAR");
        } else {
            panic!("Expected EnvVarNotFound error");
        }
    }

    #[test]
    fn test_lowercase_is_not_a_variable() {
        let content = "text: ${not_a_var}";
        assert_eq!(interpolate_env_vars(content).unwrap(), content);
    }
}
