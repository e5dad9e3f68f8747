use crate::agent::{Agent, AgentDirectory, AgentInput, AgentOutput};
use crate::config::Config;
use crate::error::{OrchestratorError, Result};
use crate::workflow::{AgentRole, Deliverable, DeliverableKind, QualityGate};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

/// Config rooted in a temp dir.
pub(crate) fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        workspace_dir: temp_dir.path().join("workspace"),
        target_project_path: temp_dir.path().to_path_buf(),
        ..Config::default()
    }
}

/// Shared observations across every scripted agent of one test.
#[derive(Debug, Default)]
pub(crate) struct Probe {
    running: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<AgentRole>>,
    previous_seen: Mutex<Vec<(AgentRole, usize)>>,
}

impl Probe {
    /// Highest number of agents observed executing at once.
    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Every invocation, in start order. Retries appear once per attempt.
    pub(crate) fn calls(&self) -> Vec<AgentRole> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self, role: AgentRole) -> usize {
        self.calls.lock().iter().filter(|r| **r == role).count()
    }

    /// How many earlier deliverables a role was handed on its last attempt.
    pub(crate) fn previous_seen(&self, role: AgentRole) -> Option<usize> {
        self.previous_seen
            .lock()
            .iter()
            .rev()
            .find(|(r, _)| *r == role)
            .map(|(_, n)| *n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureStyle {
    /// `Err(OrchestratorError::Agent)`, retryable.
    Error,
    /// `Ok(AgentOutput { success: false })`.
    Report,
    /// `Err(OrchestratorError::Config)`, never retried.
    Fatal,
}

/// Fake capability with scripted failures, delay and gates.
pub(crate) struct ScriptedAgent {
    role: AgentRole,
    probe: Arc<Probe>,
    failures_left: AtomicU32,
    style: FailureStyle,
    delay: Duration,
    gate: Option<bool>,
}

impl ScriptedAgent {
    pub(crate) fn new(role: AgentRole, probe: Arc<Probe>) -> Self {
        Self {
            role,
            probe,
            failures_left: AtomicU32::new(0),
            style: FailureStyle::Error,
            delay: Duration::ZERO,
            gate: None,
        }
    }

    pub(crate) fn role(&self) -> AgentRole {
        self.role
    }

    /// Fail the first `n` attempts.
    pub(crate) fn failing(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// Fail by returning an unsuccessful output instead of an error.
    pub(crate) fn reporting_failure(mut self) -> Self {
        self.style = FailureStyle::Report;
        self
    }

    /// Fail with a non-retryable error.
    pub(crate) fn fatal(mut self) -> Self {
        self.style = FailureStyle::Fatal;
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Emit one quality gate with the given outcome.
    pub(crate) fn with_gate(mut self, passed: bool) -> Self {
        self.gate = Some(passed);
        self
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    async fn execute(&self, input: &AgentInput) -> Result<AgentOutput> {
        self.probe.calls.lock().push(self.role);
        self.probe
            .previous_seen
            .lock()
            .push((self.role, input.previous_deliverables.len()));

        let now = self.probe.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.peak.fetch_max(now, Ordering::SeqCst);
        if self.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.delay).await;
        }
        self.probe.running.fetch_sub(1, Ordering::SeqCst);

        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            let message = format!("{} scripted failure", self.role);
            return match self.style {
                FailureStyle::Error => Err(OrchestratorError::Agent(message)),
                FailureStyle::Report => Ok(AgentOutput::failure(message)),
                FailureStyle::Fatal => Err(OrchestratorError::Config(message)),
            };
        }

        let deliverable = Deliverable::new(
            format!("{} output", self.role),
            DeliverableKind::Document,
            input.workspace_path.join(format!("{}.md", self.role)),
            self.role,
        );
        let gates = self
            .gate
            .map(|passed| QualityGate::new(format!("{} check", self.role), passed, "scripted"))
            .into_iter()
            .collect();
        Ok(AgentOutput::success(vec![deliverable], gates))
    }
}

/// Directory with a scripted agent for every role; `customize` may adjust
/// any of them.
pub(crate) fn scripted_directory<F>(probe: &Arc<Probe>, customize: F) -> AgentDirectory
where
    F: Fn(ScriptedAgent) -> ScriptedAgent,
{
    AgentRole::ALL
        .into_iter()
        .fold(AgentDirectory::builder(), |builder, role| {
            let agent = customize(ScriptedAgent::new(role, probe.clone()));
            builder.register(role, Arc::new(agent))
        })
        .build()
}
