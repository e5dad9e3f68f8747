//! Per-feature workspace state shared by every task of one execution.

use crate::workflow::{AgentRole, Deliverable, FeatureRequest, QualityGate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Pipeline stage directories created inside every workspace, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Requirements,
    Architecture,
    Database,
    Backend,
    Frontend,
    Tests,
    Reviews,
    Docs,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Requirements,
        Stage::Architecture,
        Stage::Database,
        Stage::Backend,
        Stage::Frontend,
        Stage::Tests,
        Stage::Reviews,
        Stage::Docs,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Stage::Requirements => "01-requirements",
            Stage::Architecture => "02-architecture",
            Stage::Database => "03-database",
            Stage::Backend => "04-backend",
            Stage::Frontend => "05-frontend",
            Stage::Tests => "06-tests",
            Stage::Reviews => "07-reviews",
            Stage::Docs => "08-docs",
        }
    }
}

/// Resolved paths and accumulated results for one feature.
///
/// Deliverables and quality gates are append-only; every append bumps
/// `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceContext {
    /// Slug derived from the request description.
    pub feature_name: String,

    /// Absolute path to `{workspace_dir}/feature-{slug}/`.
    pub workspace_path: PathBuf,

    /// Project the generated artifacts target.
    pub project_path: PathBuf,

    pub request: FeatureRequest,
    pub deliverables: Vec<Deliverable>,
    pub quality_gates: Vec<QualityGate>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkspaceContext {
    pub fn new(
        feature_name: String,
        workspace_path: PathBuf,
        project_path: PathBuf,
        request: FeatureRequest,
    ) -> Self {
        let now = Utc::now();
        Self {
            feature_name,
            workspace_path,
            project_path,
            request,
            deliverables: Vec::new(),
            quality_gates: Vec::new(),
            metadata: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Path to a stage directory inside this workspace.
    pub fn stage_path(&self, stage: Stage) -> PathBuf {
        stage_path(&self.workspace_path, stage)
    }

    pub fn add_deliverable(&mut self, deliverable: Deliverable) {
        self.deliverables.push(deliverable);
        self.updated_at = Utc::now();
    }

    pub fn add_quality_gate(&mut self, gate: QualityGate) {
        self.quality_gates.push(gate);
        self.updated_at = Utc::now();
    }

    /// Fold one task's results into the workspace.
    pub fn append_results(&mut self, deliverables: Vec<Deliverable>, gates: Vec<QualityGate>) {
        if deliverables.is_empty() && gates.is_empty() {
            return;
        }
        for deliverable in deliverables {
            self.add_deliverable(deliverable);
        }
        for gate in gates {
            self.add_quality_gate(gate);
        }
    }

    pub fn deliverables_by_agent(&self, role: AgentRole) -> impl Iterator<Item = &Deliverable> {
        self.deliverables.iter().filter(move |d| d.created_by == role)
    }

    pub fn has_failed_quality_gates(&self) -> bool {
        self.quality_gates.iter().any(|g| !g.passed)
    }

    pub fn failed_quality_gates(&self) -> impl Iterator<Item = &QualityGate> {
        self.quality_gates.iter().filter(|g| !g.passed)
    }
}

pub(crate) fn stage_path(workspace_path: &Path, stage: Stage) -> PathBuf {
    workspace_path.join(stage.dir_name())
}
