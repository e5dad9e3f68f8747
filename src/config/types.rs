//! Configuration types and defaults.
//!
//! This module defines the nested config sections, constants, and default
//! value functions used by the Config struct.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sdlc.yaml";

/// Settings for the language-model collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier passed to the model call (default: "claude-sonnet-4.5").
    #[serde(default = "default_model_name")]
    pub name: String,

    /// Sampling temperature used when a specialist does not set its own.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token budget for a single completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Command template for a subprocess model, e.g. `claude -p --model {model}`.
    ///
    /// Prompts are written to the command's stdin; stdout is the response.
    /// When unset, a placeholder model produces stub documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            command: None,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_workspace_dir() -> PathBuf {
    PathBuf::from("./workspace")
}
pub(crate) fn default_target_project_path() -> PathBuf {
    PathBuf::from(".")
}
pub(crate) fn default_max_parallel_agents() -> usize {
    3
}
pub(crate) fn default_agent_max_retries() -> u32 {
    2
}
pub(crate) fn default_slug_max_len() -> usize {
    crate::workspace::DEFAULT_SLUG_MAX_LEN
}
pub(crate) fn default_model_name() -> String {
    "claude-sonnet-4.5".to_string()
}
pub(crate) fn default_temperature() -> f32 {
    0.1
}
pub(crate) fn default_max_tokens() -> u32 {
    16000
}
