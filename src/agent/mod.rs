//! Agent capabilities and the directory that resolves them.
//!
//! - **Agent**: the `execute` contract every capability implements
//! - **Directory**: the closed role -> capability table
//! - **Specialist**: the standard profile-driven capability for each role
//! - **Prompt**: template rendering for specialist prompts
//!
//! Capabilities are side-effecting: each writes at least one artifact under
//! the workspace. The `success` flag reports whether the agent ran, not
//! whether its artifacts pass any quality bar; that is what gates are for.

mod directory;
pub mod prompt;
mod specialist;

pub use directory::AgentDirectory;
pub use specialist::profile_for;

use crate::error::Result;
use crate::workflow::{AgentRole, Deliverable, FeatureRequest, QualityGate, TaskInput};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Everything a capability receives for one attempt.
#[derive(Debug, Clone)]
pub struct AgentInput {
    pub role: AgentRole,
    pub feature_name: String,
    pub workspace_path: PathBuf,
    pub project_path: PathBuf,
    pub feature_request: FeatureRequest,
    /// Deliverables accumulated by earlier tasks of the same execution.
    pub previous_deliverables: Vec<Deliverable>,
}

impl AgentInput {
    pub fn from_task(
        role: AgentRole,
        feature_name: impl Into<String>,
        input: &TaskInput,
        previous_deliverables: Vec<Deliverable>,
    ) -> Self {
        Self {
            role,
            feature_name: feature_name.into(),
            workspace_path: input.workspace_path.clone(),
            project_path: input.project_path.clone(),
            feature_request: input.feature_request.clone(),
            previous_deliverables,
        }
    }
}

/// What a capability hands back.
#[derive(Debug, Clone, Default)]
pub struct AgentOutput {
    pub deliverables: Vec<Deliverable>,
    pub quality_gates: Vec<QualityGate>,
    pub metadata: Map<String, Value>,
    pub success: bool,
    pub error: Option<String>,
}

impl AgentOutput {
    pub fn success(deliverables: Vec<Deliverable>, quality_gates: Vec<QualityGate>) -> Self {
        Self {
            deliverables,
            quality_gates,
            metadata: Map::new(),
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A callable specialist capability.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Run the agent once. Returning `Err` or an output with `success == false`
    /// both count as a failed attempt.
    async fn execute(&self, input: &AgentInput) -> Result<AgentOutput>;
}
