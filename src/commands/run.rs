//! Implementation of the run commands (`full`, `from-spec`, `phase`, `agent`).

use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::{OrchestratorError, Result};
use crate::exit_codes;
use crate::workflow::{FeatureRequest, Phase, TaskStatus, WorkflowExecution, WorkflowMode};
use crate::workspace::Stage;

/// Run one feature request and report the outcome.
///
/// A workflow that ends `failed` is reported (not raised) and mapped to
/// `WORKFLOW_FAILURE`.
pub async fn cmd_run(
    config: Config,
    global: &GlobalArgs,
    request: FeatureRequest,
    mode: WorkflowMode,
) -> Result<i32> {
    let engine = Engine::from_config(config)?;
    let execution = engine.execute_feature_request(request, mode).await?;

    if global.json {
        let json = serde_json::to_string_pretty(&execution).map_err(|e| {
            OrchestratorError::Config(format!("failed to serialize execution: {}", e))
        })?;
        println!("{}", json);
    } else {
        print!("{}", render_summary(&execution));
    }

    Ok(match execution.status {
        TaskStatus::Completed => exit_codes::SUCCESS,
        _ => exit_codes::WORKFLOW_FAILURE,
    })
}

/// Human-readable report of a finished execution.
pub fn render_summary(execution: &WorkflowExecution) -> String {
    let summary = execution.summary();
    let workspace = &execution.workspace;
    let mut out = String::new();

    out.push_str("Workflow Summary\n");
    out.push_str("================\n\n");
    out.push_str(&format!("Execution: {}\n", execution.id));
    out.push_str(&format!("Feature:   {}\n", workspace.feature_name));
    out.push_str(&format!("Mode:      {}\n", execution.mode));
    out.push_str(&format!("Status:    {}\n", execution.status));
    if let Some(duration) = execution.duration() {
        out.push_str(&format!("Duration:  {}\n", seconds(duration)));
    }
    out.push_str(&format!("Workspace: {}\n\n", workspace.workspace_path.display()));

    out.push_str("Tasks:\n");
    for task in &execution.tasks {
        let retries = if task.retry_count > 0 {
            format!(" (retries: {})", task.retry_count)
        } else {
            String::new()
        };
        let produced = workspace.deliverables_by_agent(task.agent_role).count();
        let took = task
            .duration()
            .map(|d| format!(" in {}", seconds(d)))
            .unwrap_or_default();
        out.push_str(&format!(
            "  {:<15} {:<22} {:<10} {} deliverable(s){}{}\n",
            task.phase.as_str(),
            task.agent_role.as_str(),
            task.status.to_string(),
            produced,
            took,
            retries
        ));
    }
    out.push_str(&format!(
        "  {} total, {} completed, {} failed, {} skipped\n\n",
        summary.total_tasks, summary.completed, summary.failed, summary.skipped
    ));

    let finished: Vec<&str> = Phase::ALL
        .into_iter()
        .filter(|phase| execution.is_phase_complete(*phase))
        .map(|phase| phase.as_str())
        .collect();
    if !finished.is_empty() {
        out.push_str(&format!("Phases completed: {}\n", finished.join(", ")));
    }
    out.push_str(&format!("Deliverables: {}\n", summary.deliverables));
    for stage in Stage::ALL {
        let dir = workspace.stage_path(stage);
        let count = workspace
            .deliverables
            .iter()
            .filter(|d| d.path.starts_with(&dir))
            .count();
        if count > 0 {
            out.push_str(&format!("  {:<18} {}\n", stage.dir_name(), count));
        }
    }
    out.push_str(&format!(
        "Quality gates: {}/{} passed\n",
        summary.gates_passed, summary.gates_total
    ));
    if workspace.has_failed_quality_gates() {
        for gate in workspace.failed_quality_gates() {
            out.push_str(&format!("  [FAILED] {}: {}\n", gate.name, gate.message));
        }
    }

    if execution.has_failed_tasks() {
        out.push_str("\nFailed tasks:\n");
        for task in &execution.tasks {
            if let Some(error) = task.error.as_deref()
                && task.status == TaskStatus::Failed
            {
                out.push_str(&format!("  {}: {}\n", task.agent_role, error));
            }
        }
    }

    if let Some(error) = &execution.error {
        let phase = execution
            .current_phase
            .map(|p| p.to_string())
            .unwrap_or_else(|| "before first phase".to_string());
        out.push_str(&format!("\nHalted in {}: {}\n", phase, error));
    }

    out
}

fn seconds(duration: chrono::Duration) -> String {
    format!("{:.1}s", duration.num_milliseconds() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{
        AgentRole, AgentTask, Deliverable, DeliverableKind, QualityGate, TaskInput,
    };
    use crate::workspace::WorkspaceContext;
    use std::path::PathBuf;

    fn execution() -> WorkflowExecution {
        let request = FeatureRequest::new("Audit log");
        let workspace = WorkspaceContext::new(
            "audit-log".to_string(),
            PathBuf::from("/ws/feature-audit-log"),
            PathBuf::from("/projects/app"),
            request.clone(),
        );
        let mut execution = WorkflowExecution::new(WorkflowMode::Full, request.clone(), workspace);
        let mut task = AgentTask::new(
            AgentRole::SecurityEngineer,
            Phase::Review,
            "Execute security-engineer",
            TaskInput {
                workspace_path: PathBuf::from("/ws/feature-audit-log"),
                project_path: PathBuf::from("/projects/app"),
                feature_request: request,
            },
        );
        task.start();
        task.fail("model call failed: quota");
        task.retry_count = 2;
        execution.record_task(task);
        execution.workspace.add_quality_gate(QualityGate::new(
            "Security Audit",
            false,
            "critical vulnerabilities detected",
        ));
        execution
    }

    #[test]
    fn test_summary_lists_tasks_and_failed_gates() {
        let text = render_summary(&execution());

        assert!(text.contains("Feature:   audit-log"));
        assert!(text.contains("security-engineer"));
        assert!(text.contains("(retries: 2)"));
        assert!(text.contains("Quality gates: 0/1 passed"));
        assert!(text.contains("[FAILED] Security Audit"));
        assert!(text.contains("0 deliverable(s)"));
        assert!(!text.contains("Phases completed"));
        assert!(text.contains("Failed tasks:\n  security-engineer: model call failed: quota"));
        assert!(text.contains(" in 0."));
    }

    #[test]
    fn test_summary_counts_artifacts_per_stage() {
        let mut execution = execution();
        let workspace_path = execution.workspace.workspace_path.clone();
        execution.workspace.append_results(
            vec![
                Deliverable::new(
                    "Security Audit Report",
                    DeliverableKind::Report,
                    workspace_path.join("07-reviews").join("security-audit.md"),
                    AgentRole::SecurityEngineer,
                ),
                Deliverable::new(
                    "Code Review",
                    DeliverableKind::Report,
                    workspace_path.join("07-reviews").join("code-review.md"),
                    AgentRole::CodeReviewer,
                ),
            ],
            Vec::new(),
        );

        let text = render_summary(&execution);
        assert!(text.contains("Deliverables: 2\n  07-reviews"));
        assert!(!text.contains("01-requirements"));
        assert!(text.contains("1 deliverable(s)"));
    }

    #[test]
    fn test_summary_reports_halting_phase() {
        let mut execution = execution();
        execution.current_phase = Some(Phase::Review);
        execution.fail(&OrchestratorError::QualityGate("Security Audit".to_string()));

        let text = render_summary(&execution);
        assert!(text.contains("Status:    failed"));
        assert!(text.contains("Halted in review: quality gate failed: Security Audit"));
    }
}
