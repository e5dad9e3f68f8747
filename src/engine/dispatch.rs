//! Per-phase dispatch.

use super::Run;
use super::runner::run_agent;
use crate::error::{OrchestratorError, Result};
use crate::workflow::{AgentRole, AgentTask, Phase};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Materialize and run the tasks of one phase.
///
/// Disabled roles are recorded as skipped. A phase with no enabled roles is
/// trivially complete.
pub(super) async fn execute_phase_agents(run: &Run<'_>, phase: Phase) -> Result<()> {
    let engine = run.engine;
    let roster = engine.plan.roster(phase, &engine.config);

    if !roster.disabled.is_empty() {
        let mut execution = run.execution.lock();
        for role in &roster.disabled {
            let inputs = run.task_input(&execution);
            let mut task = AgentTask::new(*role, phase, task_description(*role, phase), inputs);
            task.skip();
            execution.record_task(task);
        }
    }
    for role in &roster.disabled {
        warn!(execution_id = %run.id, phase = %phase, role = %role, "agent disabled, skipping");
    }

    if roster.enabled.is_empty() {
        info!(execution_id = %run.id, phase = %phase, "no enabled agents");
        return Ok(());
    }

    if engine.plan.is_parallel(phase) && roster.enabled.len() > 1 {
        run_parallel(run, phase, &roster.enabled).await
    } else {
        run_sequential(run, phase, &roster.enabled).await
    }
}

/// Each task reaches a terminal state before the next starts.
async fn run_sequential(run: &Run<'_>, phase: Phase, roles: &[AgentRole]) -> Result<()> {
    debug!(execution_id = %run.id, phase = %phase, tasks = roles.len(), "sequential dispatch");
    for role in roles {
        run_agent(run, *role, phase).await?;
    }
    Ok(())
}

/// All tasks at once behind an admission gate of `max_parallel_agents`.
///
/// Once one task fails for good, tasks still waiting for a slot are not
/// started; tasks already running finish, then the first failure is returned.
async fn run_parallel(run: &Run<'_>, phase: Phase, roles: &[AgentRole]) -> Result<()> {
    let limit = run.engine.config.max_parallel_agents;
    debug!(
        execution_id = %run.id,
        phase = %phase,
        tasks = roles.len(),
        limit,
        "parallel dispatch"
    );

    let gate = Semaphore::new(limit.min(roles.len()));
    let halted = AtomicBool::new(false);

    let mut pending: FuturesUnordered<_> = roles
        .iter()
        .map(|role| {
            let gate = &gate;
            let halted = &halted;
            async move {
                let _permit = gate.acquire().await.map_err(|_| {
                    OrchestratorError::Config("admission gate closed".to_string())
                })?;
                if halted.load(Ordering::SeqCst) {
                    debug!(execution_id = %run.id, role = %role, "not started after sibling failure");
                    return Ok(());
                }

                let result = run_agent(run, *role, phase).await;
                if result.is_err() {
                    halted.store(true, Ordering::SeqCst);
                }
                result
            }
        })
        .collect();

    let mut first_error = None;
    while let Some(result) = pending.next().await {
        if let Err(e) = result
            && first_error.is_none()
        {
            first_error = Some(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub(super) fn task_description(role: AgentRole, phase: Phase) -> String {
    format!("Execute {} for {} phase", role, phase)
}
