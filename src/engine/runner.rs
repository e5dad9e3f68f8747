//! Single-task execution with bounded retry.

use super::Run;
use super::dispatch::task_description;
use crate::agent::{Agent, AgentInput, AgentOutput};
use crate::error::{OrchestratorError, Result};
use crate::workflow::{AgentRole, AgentTask, Phase, TaskInput, WorkflowExecution};
use std::time::Duration;
use tracing::{debug, info, warn};

impl Run<'_> {
    pub(super) fn task_input(&self, execution: &WorkflowExecution) -> TaskInput {
        TaskInput {
            workspace_path: execution.workspace.workspace_path.clone(),
            project_path: execution.workspace.project_path.clone(),
            feature_request: execution.feature_request.clone(),
        }
    }
}

/// Run one role to a terminal state.
///
/// The task is recorded once, when it first starts. Each failed attempt
/// that may be retried requeues the same task and runs it again; the attempt
/// holds its dispatch slot throughout.
///
/// # Errors
///
/// * `OrchestratorError::UnregisteredRole` - no capability for `role`; never retried
/// * `OrchestratorError::TaskFailed` - every attempt failed
/// * any non-retryable error raised by the capability, as raised
pub(super) async fn run_agent(run: &Run<'_>, role: AgentRole, phase: Phase) -> Result<()> {
    let engine = run.engine;
    let max_retries = engine.config.agent_max_retries;

    let index = {
        let mut execution = run.execution.lock();
        let inputs = run.task_input(&execution);
        let mut task = AgentTask::new(role, phase, task_description(role, phase), inputs);
        task.start();
        execution.record_task(task)
    };
    info!(execution_id = %run.id, phase = %phase, role = %role, "task started");

    let agent = match engine.directory.resolve(role) {
        Ok(agent) => agent,
        Err(e) => {
            run.execution.lock().tasks[index].fail(e.to_string());
            return Err(e);
        }
    };

    loop {
        let (input, attempt) = {
            let execution = run.execution.lock();
            let task = &execution.tasks[index];
            let input = AgentInput::from_task(
                role,
                run.feature_name.clone(),
                &task.inputs,
                execution.workspace.deliverables.clone(),
            );
            (input, task.retry_count + 1)
        };
        debug!(execution_id = %run.id, role = %role, attempt, "invoking agent");

        match attempt_once(agent.as_ref(), &input, engine.config.agent_timeout()).await {
            Ok(output) => {
                let mut execution = run.execution.lock();
                execution.tasks[index].complete(output.metadata);
                execution
                    .workspace
                    .append_results(output.deliverables, output.quality_gates);
                drop(execution);

                info!(execution_id = %run.id, phase = %phase, role = %role, attempt, "task completed");
                return Ok(());
            }
            Err(e) => {
                let retry = {
                    let mut execution = run.execution.lock();
                    let task = &mut execution.tasks[index];
                    task.fail(e.to_string());
                    let retry = e.is_retryable() && task.retry_count < max_retries;
                    if retry {
                        task.requeue();
                        task.start();
                    }
                    retry
                };

                if !e.is_retryable() {
                    warn!(execution_id = %run.id, role = %role, error = %e, "task failed, not retryable");
                    return Err(e);
                }
                if !retry {
                    warn!(execution_id = %run.id, role = %role, attempts = attempt, error = %e, "task failed, retries exhausted");
                    return Err(OrchestratorError::TaskFailed {
                        role,
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }

                warn!(
                    execution_id = %run.id,
                    role = %role,
                    attempt,
                    max_retries,
                    error = %e,
                    "task failed, retrying"
                );
            }
        }
    }
}

/// One invocation of the capability, with the optional timeout applied.
/// An output that reports `success == false` counts as a failure.
async fn attempt_once(
    agent: &dyn Agent,
    input: &AgentInput,
    timeout: Option<Duration>,
) -> Result<AgentOutput> {
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, agent.execute(input))
            .await
            .map_err(|_| OrchestratorError::Timeout {
                role: input.role,
                seconds: limit.as_secs(),
            })??,
        None => agent.execute(input).await?,
    };

    if !output.success {
        return Err(OrchestratorError::Agent(
            output
                .error
                .unwrap_or_else(|| format!("agent '{}' reported failure", input.role)),
        ));
    }
    Ok(output)
}
