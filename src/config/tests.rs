//! Tests for config functionality.

use crate::config::{Config, ModelConfig};
use crate::error::OrchestratorError;
use crate::workflow::{AgentRole, Phase};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.workspace_dir, PathBuf::from("./workspace"));
    assert_eq!(config.target_project_path, PathBuf::from("."));
    assert_eq!(config.slug_max_len, 50);
    assert_eq!(config.max_parallel_agents, 3);
    assert_eq!(config.agent_max_retries, 2);
    assert_eq!(config.agent_timeout_seconds, None);
    assert!(!config.enforce_quality_gates);
    assert!(config.phases.is_empty());
    assert!(config.agents.is_empty());
    assert_eq!(config.model, ModelConfig::default());
    assert_eq!(config.model.name, "claude-sonnet-4.5");
    assert_eq!(config.model.max_tokens, 16000);
    assert!(config.model.command.is_none());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
max_parallel_agents: 5
workspace_dir: /tmp/features
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.max_parallel_agents, 5);
    assert_eq!(config.workspace_dir, PathBuf::from("/tmp/features"));

    // Unspecified values should use defaults
    assert_eq!(config.agent_max_retries, 2);
    assert_eq!(config.model.temperature, 0.1);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
workspace_dir: ./out
target_project_path: ../app
slug_max_len: 30
max_parallel_agents: 2
agent_max_retries: 4
agent_timeout_seconds: 600
enforce_quality_gates: true
phases:
  review: false
  product: true
agents:
  devops-engineer: false
  e2e-test-engineer: false
model:
  name: gpt-4o
  temperature: 0.3
  max_tokens: 8000
  command: "claude -p --model {model}"
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.workspace_dir, PathBuf::from("./out"));
    assert_eq!(config.target_project_path, PathBuf::from("../app"));
    assert_eq!(config.slug_max_len, 30);
    assert_eq!(config.max_parallel_agents, 2);
    assert_eq!(config.agent_max_retries, 4);
    assert_eq!(config.agent_timeout(), Some(Duration::from_secs(600)));
    assert!(config.enforce_quality_gates);

    assert!(!config.is_phase_enabled(Phase::Review));
    assert!(config.is_phase_enabled(Phase::Requirements));
    assert!(config.is_phase_enabled(Phase::Deployment));

    assert!(!config.is_agent_enabled(AgentRole::DevopsEngineer));
    assert!(!config.is_agent_enabled(AgentRole::E2eTestEngineer));
    assert!(config.is_agent_enabled(AgentRole::TechnicalWriter));

    assert_eq!(config.model.name, "gpt-4o");
    assert_eq!(config.model.temperature, 0.3);
    assert_eq!(config.model.max_tokens, 8000);
    assert_eq!(
        config.model.command.as_deref(),
        Some("claude -p --model {model}")
    );
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
max_parallel_agents: 4
slack_webhook_url: https://example.invalid/hook
future_section:
  nested: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.max_parallel_agents, 4);
}

#[test]
fn test_unknown_phase_is_rejected() {
    let result = Config::from_yaml("phases:\n  marketing: false\n");
    assert!(matches!(result, Err(OrchestratorError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_parallelism() {
    let err = Config::from_yaml("max_parallel_agents: 0").unwrap_err();
    assert!(err.to_string().contains("max_parallel_agents"));
}

#[test]
fn test_validate_rejects_zero_slug_length() {
    let err = Config::from_yaml("slug_max_len: 0").unwrap_err();
    assert!(err.to_string().contains("slug_max_len"));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let err = Config::from_yaml("agent_timeout_seconds: 0").unwrap_err();
    assert!(err.to_string().contains("agent_timeout_seconds"));
}

#[test]
fn test_validate_rejects_out_of_range_temperature() {
    let err = Config::from_yaml("model:\n  temperature: 1.5\n").unwrap_err();
    assert!(err.to_string().contains("model.temperature"));
}

#[test]
fn test_validate_rejects_blank_command() {
    let err = Config::from_yaml("model:\n  command: \"  \"\n").unwrap_err();
    assert!(err.to_string().contains("model.command"));
}

#[test]
fn test_yaml_round_trip_preserves_settings() {
    let mut config = Config::default();
    config.max_parallel_agents = 7;
    config.set_phase_enabled(Phase::Testing, false);
    config.set_agent_enabled(AgentRole::CodeReviewer, false);

    let yaml = config.to_yaml().unwrap();
    let parsed = Config::from_yaml(&yaml).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("sdlc.yaml");
    std::fs::write(&path, "agent_max_retries: 0\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.agent_max_retries, 0);
}

#[test]
fn test_load_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn test_resolve_with_explicit_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.yaml");
    std::fs::write(&path, "max_parallel_agents: 9\n").unwrap();

    let config = Config::resolve(Some(&path)).unwrap();
    assert_eq!(config.max_parallel_agents, 9);
}
