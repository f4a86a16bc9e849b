//! Configuration module for the agent chat client
//!
//! This module provides the configuration schema, file loaders with
//! `${VAR}` environment interpolation, and validation.

mod env;
mod error;
mod schema;
mod validator;

pub use env::interpolate_env_vars;
pub use error::{ConfigError, ConfigResult, FieldProblem, ValidationError};
pub use schema::{
    ClientConfig, EndpointConfig, IdentityConfig, RenderConfig, CONFIG_VERSION,
    DEFAULT_ERROR_MESSAGE,
};
pub use validator::ConfigValidator;

use std::fs;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    let content = read_config(path)?;

    let config: ClientConfig =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a configuration from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    let content = read_config(path)?;

    let config: ClientConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// Load a configuration, choosing the format from the file extension
pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<ClientConfig> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_from_json(path),
        Some("yaml") | Some("yml") => load_from_yaml(path),
        other => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: other.unwrap_or_default().to_string(),
        }),
    }
}

fn read_config(path: &Path) -> ConfigResult<String> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Interpolate environment variables before parsing
    interpolate_env_vars(&content)
}
