//! Agent tasks: one role executing within one phase of one execution.

use super::request::FeatureRequest;
use super::types::{AgentRole, Phase, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Input bundle handed to the agent capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub workspace_path: PathBuf,
    pub project_path: PathBuf,
    pub feature_request: FeatureRequest,
}

/// A scheduled invocation of an agent role.
///
/// A retried task keeps its identity; only `retry_count`, `status`,
/// timestamps and `error` change between attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTask {
    pub agent_role: AgentRole,
    pub phase: Phase,
    pub description: String,
    pub inputs: TaskInput,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub outputs: Map<String, Value>,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub retry_count: u32,
}

impl AgentTask {
    pub fn new(
        agent_role: AgentRole,
        phase: Phase,
        description: impl Into<String>,
        inputs: TaskInput,
    ) -> Self {
        Self {
            agent_role,
            phase,
            description: description.into(),
            inputs,
            outputs: Map::new(),
            status: TaskStatus::Pending,
            started_at: None,
            completed_at: None,
            error: None,
            retry_count: 0,
        }
    }

    /// Stamp the start of an attempt.
    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
        self.started_at = Some(Utc::now());
        self.completed_at = None;
    }

    pub fn complete(&mut self, outputs: Map<String, Value>) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.outputs = outputs;
        self.error = None;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error.into());
    }

    /// Put a failed task back in the queue for another attempt.
    pub fn requeue(&mut self) {
        self.status = TaskStatus::Pending;
        self.retry_count += 1;
    }

    pub fn skip(&mut self) {
        self.status = TaskStatus::Skipped;
        self.completed_at = Some(Utc::now());
    }

    /// Wall-clock duration of the latest attempt, if it finished.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}
