//! Execution engine.
//!
//! Turns a feature request plus a workflow mode into a [`WorkflowExecution`]:
//!
//! 1. Provision the feature workspace
//! 2. Walk the phases the mode selects, in pipeline order
//! 3. Dispatch each phase's enabled roles, concurrently for parallel phases
//!    (bounded by `max_parallel_agents`) and one at a time otherwise
//! 4. Retry failing tasks up to `agent_max_retries`, then fail the workflow
//!
//! # Failure model
//!
//! `execute_feature_request` returns `Err` only when the execution cannot
//! start: the workspace cannot be created, or the same feature is already
//! running. Anything that goes wrong during the walk is recorded on the
//! returned execution (`status = failed`, `error` set, `current_phase`
//! pointing at the phase that halted).

mod dispatch;
mod runner;


use crate::agent::AgentDirectory;
use crate::config::Config;
use crate::error::{OrchestratorError, Result};
use crate::fs::FsArtifactStore;
use crate::llm;
use crate::plan::PhasePlan;
use crate::workflow::{FeatureRequest, WorkflowExecution, WorkflowMode};
use crate::workspace::WorkspaceManager;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Runs feature requests through the phase plan.
#[derive(Debug)]
pub struct Engine {
    config: Config,
    plan: PhasePlan,
    directory: AgentDirectory,
    workspaces: WorkspaceManager,
    /// Feature names with an execution in flight.
    active: Mutex<HashSet<String>>,
}

impl Engine {
    /// Engine over the standard phase plan.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::Config` - invalid config, or a registered role
    ///   the plan does not place in any phase
    pub fn new(config: Config, directory: AgentDirectory) -> Result<Self> {
        Self::with_plan(config, PhasePlan::standard()?, directory)
    }

    pub fn with_plan(config: Config, plan: PhasePlan, directory: AgentDirectory) -> Result<Self> {
        config.validate()?;
        plan.validate(&directory)?;

        let workspaces = WorkspaceManager::new(&config.workspace_dir, &config.target_project_path)
            .with_slug_max_len(config.slug_max_len);

        Ok(Self {
            config,
            plan,
            directory,
            workspaces,
            active: Mutex::new(HashSet::new()),
        })
    }

    /// Engine with the standard specialists, the configured model and the
    /// filesystem artifact store.
    pub fn from_config(config: Config) -> Result<Self> {
        let model = llm::from_config(&config.model);
        let directory = AgentDirectory::standard(&config.model, model, Arc::new(FsArtifactStore));
        Self::new(config, directory)
    }

    /// Run one feature request to a terminal status.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::ExecutionInProgress` - this feature is already
    ///   being executed by this engine
    /// * `OrchestratorError::Workspace` - the workspace could not be created
    pub async fn execute_feature_request(
        &self,
        request: FeatureRequest,
        mode: WorkflowMode,
    ) -> Result<WorkflowExecution> {
        let feature_name = self.workspaces.feature_name(&request);
        let _claim = self.claim(&feature_name)?;

        let workspace = self.workspaces.create(&request)?;
        let mut execution = WorkflowExecution::new(mode, request, workspace);
        execution.start();

        let id = execution.id;
        info!(
            execution_id = %id,
            feature = %feature_name,
            mode = %mode,
            workspace = %execution.workspace.workspace_path.display(),
            "workflow started"
        );

        let run = Run {
            engine: self,
            id,
            feature_name,
            execution: Mutex::new(execution),
        };
        let outcome = run.walk(&mode).await;
        let mut execution = run.execution.into_inner();

        match outcome {
            Ok(()) => {
                debug_assert!(execution.tasks.iter().all(|t| t.status.is_terminal()));
                execution.complete();
                let summary = execution.summary();
                info!(
                    execution_id = %id,
                    tasks = summary.total_tasks,
                    deliverables = summary.deliverables,
                    gates_passed = summary.gates_passed,
                    gates_total = summary.gates_total,
                    "workflow completed"
                );
            }
            Err(e) => {
                error!(
                    execution_id = %id,
                    phase = ?execution.current_phase,
                    error = %e,
                    "workflow failed"
                );
                execution.fail(&e);
            }
        }

        Ok(execution)
    }

    fn claim(&self, feature_name: &str) -> Result<ActiveClaim<'_>> {
        if !self.active.lock().insert(feature_name.to_string()) {
            return Err(OrchestratorError::ExecutionInProgress(
                feature_name.to_string(),
            ));
        }
        Ok(ActiveClaim {
            active: &self.active,
            feature_name: feature_name.to_string(),
        })
    }
}

/// Releases a feature name when its execution ends.
struct ActiveClaim<'a> {
    active: &'a Mutex<HashSet<String>>,
    feature_name: String,
}

impl Drop for ActiveClaim<'_> {
    fn drop(&mut self) {
        self.active.lock().remove(&self.feature_name);
    }
}

/// State of one execution while its phases are walked.
///
/// The execution record is the only state shared by concurrently running
/// tasks. Every lock is taken for a single update and never held across an
/// await.
pub(crate) struct Run<'a> {
    engine: &'a Engine,
    id: Uuid,
    feature_name: String,
    execution: Mutex<WorkflowExecution>,
}

impl Run<'_> {
    async fn walk(&self, mode: &WorkflowMode) -> Result<()> {
        let config = &self.engine.config;

        if matches!(mode, WorkflowMode::FromExistingSpec) {
            self.check_spec()?;
        }

        if let WorkflowMode::SingleAgent(role) = mode {
            let phase = self
                .engine
                .plan
                .phase_for_agent(*role)
                .ok_or(OrchestratorError::UnregisteredRole(*role))?;
            self.execution.lock().enter_phase(phase)?;
            return runner::run_agent(self, *role, phase).await;
        }

        for phase in mode.phases() {
            if !config.is_phase_enabled(phase) {
                warn!(execution_id = %self.id, phase = %phase, "phase disabled, skipping");
                continue;
            }

            let gates_before = {
                let mut execution = self.execution.lock();
                execution.enter_phase(phase)?;
                execution.workspace.quality_gates.len()
            };
            info!(execution_id = %self.id, phase = %phase, "phase started");

            dispatch::execute_phase_agents(self, phase).await?;
            self.check_gates(gates_before)?;

            info!(execution_id = %self.id, phase = %phase, "phase finished");
        }

        Ok(())
    }

    fn check_spec(&self) -> Result<()> {
        let spec_path = self.execution.lock().feature_request.spec_path.clone();
        match spec_path {
            Some(path) if path.exists() => Ok(()),
            Some(path) => Err(OrchestratorError::SpecNotFound(path)),
            None => Err(OrchestratorError::Config(
                "from-existing-spec mode requires a spec path".to_string(),
            )),
        }
    }

    /// Report gates that failed during the phase; fatal only when enforced.
    fn check_gates(&self, gates_before: usize) -> Result<()> {
        let failed: Vec<String> = {
            let execution = self.execution.lock();
            execution.workspace.quality_gates[gates_before..]
                .iter()
                .filter(|g| !g.passed)
                .map(|g| format!("{} ({})", g.name, g.message))
                .collect()
        };

        for gate in &failed {
            warn!(execution_id = %self.id, gate = %gate, "quality gate failed");
        }

        if self.engine.config.enforce_quality_gates && !failed.is_empty() {
            return Err(OrchestratorError::QualityGate(failed.join(", ")));
        }
        Ok(())
    }
}
