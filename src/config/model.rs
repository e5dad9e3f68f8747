//! Config struct definition and default implementation.

use super::types::*;
use crate::workflow::{AgentRole, Phase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for the orchestrator.
///
/// Passed explicitly into the engine at construction. Unknown fields in the
/// YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Paths
    // =========================================================================
    /// Directory under which `feature-{slug}` workspaces are created.
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,

    /// Project the generated artifacts target (handed to agents).
    #[serde(default = "default_target_project_path")]
    pub target_project_path: PathBuf,

    /// Upper bound on the length of derived feature slugs.
    #[serde(default = "default_slug_max_len")]
    pub slug_max_len: usize,

    // =========================================================================
    // Execution policy
    // =========================================================================
    /// Maximum agents running at once inside a parallel phase.
    #[serde(default = "default_max_parallel_agents")]
    pub max_parallel_agents: usize,

    /// Retries per task after the first failed attempt.
    #[serde(default = "default_agent_max_retries")]
    pub agent_max_retries: u32,

    /// Per-attempt timeout in seconds. Unset means no timeout is enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_timeout_seconds: Option<u64>,

    /// Whether a failed quality gate fails the workflow after its phase.
    #[serde(default)]
    pub enforce_quality_gates: bool,

    // =========================================================================
    // Enablement
    // =========================================================================
    /// Per-phase switches. Phases not listed are enabled.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub phases: BTreeMap<Phase, bool>,

    /// Per-agent switches. Roles not listed are enabled.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<AgentRole, bool>,

    // =========================================================================
    // Model
    // =========================================================================
    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_dir(),
            target_project_path: default_target_project_path(),
            slug_max_len: default_slug_max_len(),
            max_parallel_agents: default_max_parallel_agents(),
            agent_max_retries: default_agent_max_retries(),
            agent_timeout_seconds: None,
            enforce_quality_gates: false,
            phases: BTreeMap::new(),
            agents: BTreeMap::new(),
            model: ModelConfig::default(),
        }
    }
}
