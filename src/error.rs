//! Error types for the orchestrator.
//!
//! Uses thiserror for derive macros. Every variant knows its exit code and
//! whether the engine may retry the task that raised it.

use crate::exit_codes;
use crate::workflow::AgentRole;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for orchestrator operations.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Invalid configuration or phase plan.
    #[error("{0}")]
    Config(String),

    /// A role was dispatched that has no capability in the agent directory.
    #[error("no agent registered for role '{0}'")]
    UnregisteredRole(AgentRole),

    /// The referenced specification document does not exist.
    #[error("referenced spec not found: {}", .0.display())]
    SpecNotFound(PathBuf),

    /// The feature workspace could not be created.
    #[error("workspace error: {0}")]
    Workspace(String),

    /// An agent capability raised or reported a failure.
    #[error("agent failed: {0}")]
    Agent(String),

    /// The language-model call failed.
    #[error("model call failed: {0}")]
    Model(String),

    /// A deliverable could not be persisted.
    #[error("artifact write failed: {0}")]
    Artifact(String),

    /// An agent attempt exceeded the configured per-agent timeout.
    #[error("agent '{role}' timed out after {seconds}s")]
    Timeout { role: AgentRole, seconds: u64 },

    /// A task kept failing after every retry was spent.
    #[error("agent '{role}' failed after {attempts} attempt(s): {message}")]
    TaskFailed {
        role: AgentRole,
        attempts: u32,
        message: String,
    },

    /// A quality gate failed while gate enforcement is enabled.
    #[error("quality gate failed: {0}")]
    QualityGate(String),

    /// Another execution is already running for this feature.
    #[error("an execution for feature '{0}' is already in progress")]
    ExecutionInProgress(String),
}

impl OrchestratorError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::Config(_)
            | OrchestratorError::UnregisteredRole(_)
            | OrchestratorError::SpecNotFound(_) => exit_codes::USER_ERROR,
            OrchestratorError::Workspace(_) => exit_codes::WORKSPACE_FAILURE,
            OrchestratorError::ExecutionInProgress(_) => exit_codes::BUSY,
            OrchestratorError::Agent(_)
            | OrchestratorError::Model(_)
            | OrchestratorError::Artifact(_)
            | OrchestratorError::Timeout { .. }
            | OrchestratorError::TaskFailed { .. }
            | OrchestratorError::QualityGate(_) => exit_codes::WORKFLOW_FAILURE,
        }
    }

    /// Whether a task that raised this error may be attempted again.
    ///
    /// Configuration problems are never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Agent(_)
                | OrchestratorError::Model(_)
                | OrchestratorError::Artifact(_)
                | OrchestratorError::Timeout { .. }
        )
    }
}

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_user_errors() {
        let err = OrchestratorError::Config("bad".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = OrchestratorError::UnregisteredRole(AgentRole::CodeReviewer);
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

        let err = OrchestratorError::SpecNotFound(PathBuf::from("missing.md"));
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn workspace_error_has_its_own_exit_code() {
        let err = OrchestratorError::Workspace("read-only".to_string());
        assert_eq!(err.exit_code(), exit_codes::WORKSPACE_FAILURE);
    }

    #[test]
    fn busy_error_has_its_own_exit_code() {
        let err = OrchestratorError::ExecutionInProgress("team-log".to_string());
        assert_eq!(err.exit_code(), exit_codes::BUSY);
    }

    #[test]
    fn only_execution_failures_are_retryable() {
        assert!(OrchestratorError::Agent("boom".into()).is_retryable());
        assert!(OrchestratorError::Model("rate limited".into()).is_retryable());
        assert!(OrchestratorError::Artifact("disk full".into()).is_retryable());
        assert!(
            OrchestratorError::Timeout {
                role: AgentRole::QaEngineer,
                seconds: 5
            }
            .is_retryable()
        );

        assert!(!OrchestratorError::UnregisteredRole(AgentRole::QaEngineer).is_retryable());
        assert!(!OrchestratorError::Config("x".into()).is_retryable());
        assert!(!OrchestratorError::SpecNotFound(PathBuf::from("x")).is_retryable());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = OrchestratorError::UnregisteredRole(AgentRole::DevopsEngineer);
        assert_eq!(
            err.to_string(),
            "no agent registered for role 'devops-engineer'"
        );

        let err = OrchestratorError::TaskFailed {
            role: AgentRole::BackendEngineer,
            attempts: 3,
            message: "agent failed: boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "agent 'backend-engineer' failed after 3 attempt(s): agent failed: boom"
        );
    }
}
