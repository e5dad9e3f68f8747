//! Workflow executions: one end-to-end run for one feature request.

use super::request::FeatureRequest;
use super::task::AgentTask;
use super::types::{Phase, TaskStatus, WorkflowMode};
use crate::error::{OrchestratorError, Result};
use crate::workspace::WorkspaceContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of one run of the engine.
///
/// Status moves `pending -> running -> {completed | failed}`. `tasks` is in
/// dispatch order, not completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub id: Uuid,
    pub mode: WorkflowMode,
    pub feature_request: FeatureRequest,
    pub workspace: WorkspaceContext,
    pub tasks: Vec<AgentTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_phase: Option<Phase>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkflowExecution {
    pub fn new(mode: WorkflowMode, feature_request: FeatureRequest, workspace: WorkspaceContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            feature_request,
            workspace,
            tasks: Vec::new(),
            current_phase: None,
            started_at: Utc::now(),
            completed_at: None,
            status: TaskStatus::Pending,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
        self.started_at = Utc::now();
    }

    /// Advance `current_phase`. Phases are never revisited.
    pub fn enter_phase(&mut self, phase: Phase) -> Result<()> {
        if let Some(current) = self.current_phase
            && phase <= current
        {
            return Err(OrchestratorError::Config(format!(
                "phase '{}' cannot follow '{}'",
                phase, current
            )));
        }
        self.current_phase = Some(phase);
        Ok(())
    }

    /// Append a task and return its index in the task list.
    pub fn record_task(&mut self, task: AgentTask) -> usize {
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: &OrchestratorError) {
        self.status = TaskStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error.to_string());
    }

    pub fn tasks_by_phase(&self, phase: Phase) -> impl Iterator<Item = &AgentTask> {
        self.tasks.iter().filter(move |t| t.phase == phase)
    }

    pub fn tasks_by_status(&self, status: TaskStatus) -> impl Iterator<Item = &AgentTask> {
        self.tasks.iter().filter(move |t| t.status == status)
    }

    /// A phase is complete when it has tasks and all of them completed or were skipped.
    pub fn is_phase_complete(&self, phase: Phase) -> bool {
        let mut tasks = self.tasks_by_phase(phase).peekable();
        if tasks.peek().is_none() {
            return false;
        }
        tasks.all(|t| matches!(t.status, TaskStatus::Completed | TaskStatus::Skipped))
    }

    pub fn has_failed_tasks(&self) -> bool {
        self.tasks.iter().any(|t| t.status == TaskStatus::Failed)
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    pub fn summary(&self) -> ExecutionSummary {
        let gates = &self.workspace.quality_gates;
        ExecutionSummary {
            total_tasks: self.tasks.len(),
            completed: self.tasks_by_status(TaskStatus::Completed).count(),
            failed: self.tasks_by_status(TaskStatus::Failed).count(),
            skipped: self.tasks_by_status(TaskStatus::Skipped).count(),
            deliverables: self.workspace.deliverables.len(),
            gates_passed: gates.iter().filter(|g| g.passed).count(),
            gates_total: gates.len(),
        }
    }
}

/// Counts derived from an execution for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub total_tasks: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub deliverables: usize,
    pub gates_passed: usize,
    pub gates_total: usize,
}
