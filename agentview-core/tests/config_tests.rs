//! Integration tests for configuration loading and validation

use agentview_core::config::{load, load_from_json, load_from_yaml, ConfigError, FieldProblem};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test config file
fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_valid_yaml_config() {
    std::env::set_var("AGENTVIEW_TEST_BACKEND", "http://localhost:8000");

    let yaml = r#"
version: "0.1"
endpoint:
  base_url: ${AGENTVIEW_TEST_BACKEND}
  request_timeout_secs: 120
identity:
  user_id: analyst
render:
  charts: false
"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "client.yaml", yaml);

    let config = load_from_yaml(path).unwrap();
    assert_eq!(config.endpoint.base_url, "http://localhost:8000");
    assert_eq!(config.endpoint.chat_path, "/chat");
    assert_eq!(config.endpoint.request_timeout_secs, Some(120));
    assert_eq!(config.identity.user_id, "analyst");
    assert_eq!(config.identity.session_id, "default_session");
    assert!(!config.render.charts);
    assert!(config.render.markdown);

    std::env::remove_var("AGENTVIEW_TEST_BACKEND");
}

#[test]
fn test_load_valid_json_config() {
    let json = r#"{
        "version": "0.1",
        "endpoint": { "base_url": "https://agents.example.com", "chat_path": "/api/chat" },
        "error_message": "The agent is unavailable."
    }"#;

    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "client.json", json);

    let config = load(path).unwrap();
    assert_eq!(config.endpoint.chat_path, "/api/chat");
    assert_eq!(config.error_message, "The agent is unavailable.");
}

#[test]
fn test_missing_env_var() {
    let yaml = r#"
version: "0.1"
endpoint:
  base_url: ${AGENTVIEW_UNSET_BACKEND}
"#;
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "client.yaml", yaml);

    match load_from_yaml(path) {
        Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "AGENTVIEW_UNSET_BACKEND"),
        other => panic!("Expected EnvVarNotFound, got {:?}", other),
    }
}

#[test]
fn test_parse_error_reports_location() {
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "client.json", "{ \"version\": \"0.1\", ");

    match load_from_json(path) {
        Err(ConfigError::Parse { line, .. }) => assert_eq!(line, Some(1)),
        other => panic!("Expected Parse, got {:?}", other),
    }
}

#[test]
fn test_invalid_base_url() {
    let yaml = r#"
version: "0.1"
endpoint:
  base_url: "localhost:8000"
"#;
    let dir = TempDir::new().unwrap();
    let path = create_test_file(&dir, "client.yml", yaml);

    match load(path) {
        Err(ConfigError::Invalid(err)) => {
            assert_eq!(err.field, "endpoint.base_url");
            assert!(matches!(err.problem, FieldProblem::InvalidUrl { .. }));
        }
        other => panic!("Expected Invalid, got {:?}", other),
    }
}

#[test]
fn test_missing_file() {
    let result = load_from_yaml("/nonexistent/client.yaml");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
