//! Config loading, validation, and enablement queries.

use super::model::Config;
use super::types::DEFAULT_CONFIG_FILE;
use crate::error::{OrchestratorError, Result};
use crate::workflow::{AgentRole, Phase};
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(OrchestratorError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            OrchestratorError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Without one, `sdlc.yaml` in the working
    /// directory is used when present, otherwise defaults apply.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults".
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                OrchestratorError::Config(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            OrchestratorError::Config(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `max_parallel_agents` must be positive
    /// - `slug_max_len` must be positive
    /// - `agent_timeout_seconds`, when set, must be positive
    /// - `model.temperature` must be within 0.0..=1.0
    /// - `model.max_tokens` must be positive
    /// - `model.command`, when set, must not be blank
    pub fn validate(&self) -> Result<()> {
        if self.max_parallel_agents == 0 {
            return Err(invalid("max_parallel_agents must be greater than 0"));
        }

        if self.slug_max_len == 0 {
            return Err(invalid("slug_max_len must be greater than 0"));
        }

        if self.agent_timeout_seconds == Some(0) {
            return Err(invalid(
                "agent_timeout_seconds must be greater than 0 (omit it to disable the timeout)",
            ));
        }

        if !(0.0..=1.0).contains(&self.model.temperature) {
            return Err(OrchestratorError::Config(format!(
                "config validation failed: model.temperature must be between 0.0 and 1.0 (found {})",
                self.model.temperature
            )));
        }

        if self.model.max_tokens == 0 {
            return Err(invalid("model.max_tokens must be greater than 0"));
        }

        if let Some(command) = &self.model.command
            && command.trim().is_empty()
        {
            return Err(invalid("model.command must not be empty"));
        }

        Ok(())
    }

    /// Whether a phase should run. Unlisted phases are enabled.
    pub fn is_phase_enabled(&self, phase: Phase) -> bool {
        self.phases.get(&phase).copied().unwrap_or(true)
    }

    /// Whether an agent should run. Unlisted roles are enabled.
    pub fn is_agent_enabled(&self, role: AgentRole) -> bool {
        self.agents.get(&role).copied().unwrap_or(true)
    }

    pub fn set_phase_enabled(&mut self, phase: Phase, enabled: bool) {
        self.phases.insert(phase, enabled);
    }

    pub fn set_agent_enabled(&mut self, role: AgentRole, enabled: bool) {
        self.agents.insert(role, enabled);
    }

    /// The per-agent timeout, if one is configured.
    pub fn agent_timeout(&self) -> Option<Duration> {
        self.agent_timeout_seconds.map(Duration::from_secs)
    }
}

fn invalid(message: &str) -> OrchestratorError {
    OrchestratorError::Config(format!("config validation failed: {}", message))
}
