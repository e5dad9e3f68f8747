//! Closed enumerations shared by the workflow model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six fixed SDLC stages, in walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    #[serde(alias = "product")]
    Requirements,
    Architecture,
    Implementation,
    Testing,
    Review,
    Deployment,
}

impl Phase {
    /// All phases in their declared order.
    pub const ALL: [Phase; 6] = [
        Phase::Requirements,
        Phase::Architecture,
        Phase::Implementation,
        Phase::Testing,
        Phase::Review,
        Phase::Deployment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Requirements => "requirements",
            Phase::Architecture => "architecture",
            Phase::Implementation => "implementation",
            Phase::Testing => "testing",
            Phase::Review => "review",
            Phase::Deployment => "deployment",
        }
    }

    /// Human-readable heading used by the `agents` listing.
    pub fn title(&self) -> &'static str {
        match self {
            Phase::Requirements => "Product Definition",
            Phase::Architecture => "Architecture & Design",
            Phase::Implementation => "Implementation",
            Phase::Testing => "Testing",
            Phase::Review => "Security & Review",
            Phase::Deployment => "Documentation & Deployment",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "product" {
            return Ok(Phase::Requirements);
        }
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown phase '{}' (expected one of: {})",
                    s,
                    Phase::ALL.map(|p| p.as_str()).join(", ")
                )
            })
    }
}

/// A specialist role. Every role belongs to exactly one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentRole {
    // Requirements
    ProductManager,
    UxResearcher,
    BusinessAnalyst,

    // Architecture
    SolutionsArchitect,
    DatabaseArchitect,
    SecurityArchitect,

    // Implementation
    DatabaseEngineer,
    BackendEngineer,
    FrontendEngineer,

    // Testing
    QaEngineer,
    #[serde(rename = "e2e-test-engineer")]
    E2eTestEngineer,
    DbTestEngineer,

    // Review
    SecurityEngineer,
    CodeReviewer,
    PerformanceEngineer,

    // Deployment
    TechnicalWriter,
    DevopsEngineer,
}

impl AgentRole {
    /// Every role, grouped by phase in plan order.
    pub const ALL: [AgentRole; 17] = [
        AgentRole::ProductManager,
        AgentRole::UxResearcher,
        AgentRole::BusinessAnalyst,
        AgentRole::SolutionsArchitect,
        AgentRole::DatabaseArchitect,
        AgentRole::SecurityArchitect,
        AgentRole::DatabaseEngineer,
        AgentRole::BackendEngineer,
        AgentRole::FrontendEngineer,
        AgentRole::QaEngineer,
        AgentRole::E2eTestEngineer,
        AgentRole::DbTestEngineer,
        AgentRole::SecurityEngineer,
        AgentRole::CodeReviewer,
        AgentRole::PerformanceEngineer,
        AgentRole::TechnicalWriter,
        AgentRole::DevopsEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::ProductManager => "product-manager",
            AgentRole::UxResearcher => "ux-researcher",
            AgentRole::BusinessAnalyst => "business-analyst",
            AgentRole::SolutionsArchitect => "solutions-architect",
            AgentRole::DatabaseArchitect => "database-architect",
            AgentRole::SecurityArchitect => "security-architect",
            AgentRole::DatabaseEngineer => "database-engineer",
            AgentRole::BackendEngineer => "backend-engineer",
            AgentRole::FrontendEngineer => "frontend-engineer",
            AgentRole::QaEngineer => "qa-engineer",
            AgentRole::E2eTestEngineer => "e2e-test-engineer",
            AgentRole::DbTestEngineer => "db-test-engineer",
            AgentRole::SecurityEngineer => "security-engineer",
            AgentRole::CodeReviewer => "code-reviewer",
            AgentRole::PerformanceEngineer => "performance-engineer",
            AgentRole::TechnicalWriter => "technical-writer",
            AgentRole::DevopsEngineer => "devops-engineer",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown agent role '{}'", s))
    }
}

/// Lifecycle status shared by tasks and workflow executions.
///
/// Tasks move `pending -> running -> {completed | failed | skipped}`;
/// executions never use `skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Skipped
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Phase-sequencing strategy for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "target", rename_all = "kebab-case")]
pub enum WorkflowMode {
    /// All six phases in order.
    Full,
    /// Every phase except requirements; the request must reference an existing spec.
    FromExistingSpec,
    /// Exactly one phase.
    SinglePhase(Phase),
    /// One task for one role, bypassing phase iteration.
    SingleAgent(AgentRole),
}

impl WorkflowMode {
    /// The phases this mode walks, in order. Empty for `SingleAgent`.
    pub fn phases(&self) -> Vec<Phase> {
        match self {
            WorkflowMode::Full => Phase::ALL.to_vec(),
            WorkflowMode::FromExistingSpec => Phase::ALL
                .into_iter()
                .filter(|phase| *phase != Phase::Requirements)
                .collect(),
            WorkflowMode::SinglePhase(phase) => vec![*phase],
            WorkflowMode::SingleAgent(_) => Vec::new(),
        }
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowMode::Full => write!(f, "full"),
            WorkflowMode::FromExistingSpec => write!(f, "from-existing-spec"),
            WorkflowMode::SinglePhase(phase) => write!(f, "single-phase ({})", phase),
            WorkflowMode::SingleAgent(role) => write!(f, "single-agent ({})", role),
        }
    }
}

/// Kind tag of a deliverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableKind {
    File,
    Document,
    Report,
}
