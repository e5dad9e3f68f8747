//! Language-model boundary.
//!
//! Specialists call a [`LanguageModel`] once per attempt with a system prompt
//! and a user prompt; the engine itself never talks to a model. Two
//! implementations ship with the crate:
//!
//! - [`PlaceholderModel`] returns a deterministic stub document, so a
//!   workflow can be exercised end to end without any provider configured
//! - [`CommandModel`] runs a configured CLI (e.g. `claude -p`) as a
//!   subprocess, writing the prompts to stdin and reading the reply from stdout

mod command;

pub use command::CommandModel;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::workflow::AgentRole;
use async_trait::async_trait;
use std::sync::Arc;

/// One text-in/text-out request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub role: AgentRole,
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Stands in for a provider when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderModel;

#[async_trait]
impl LanguageModel for PlaceholderModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        Ok(format!(
            "# {}\n\n[Placeholder response from {}]\n",
            request.role, request.model
        ))
    }
}

/// Pick the model implementation the config asks for.
pub fn from_config(config: &ModelConfig) -> Arc<dyn LanguageModel> {
    match &config.command {
        Some(template) => Arc::new(CommandModel::new(template.clone())),
        None => Arc::new(PlaceholderModel),
    }
}
