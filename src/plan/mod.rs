//! Static phase plan: which roles run in each phase, and how.
//!
//! The plan is checked once when the engine is built. Every role may appear
//! in at most one phase, phases are listed in pipeline order, and every role
//! registered in the agent directory must be reachable from some phase.


use crate::agent::AgentDirectory;
use crate::config::Config;
use crate::error::{OrchestratorError, Result};
use crate::workflow::{AgentRole, Phase};
use serde::Serialize;
use std::collections::BTreeMap;

/// Roles and concurrency policy for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseEntry {
    pub phase: Phase,
    /// Dispatch order for sequential phases.
    pub roles: Vec<AgentRole>,
    /// Whether the phase's tasks may run concurrently.
    pub parallel: bool,
}

impl PhaseEntry {
    pub fn sequential(phase: Phase, roles: &[AgentRole]) -> Self {
        Self {
            phase,
            roles: roles.to_vec(),
            parallel: false,
        }
    }

    pub fn parallel(phase: Phase, roles: &[AgentRole]) -> Self {
        Self {
            phase,
            roles: roles.to_vec(),
            parallel: true,
        }
    }
}

/// Roles of one phase split by enablement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseRoster {
    pub enabled: Vec<AgentRole>,
    pub disabled: Vec<AgentRole>,
}

/// Validated phase -> roles table with its inverse.
#[derive(Debug, Clone)]
pub struct PhasePlan {
    entries: Vec<PhaseEntry>,
    owners: BTreeMap<AgentRole, Phase>,
}

impl PhasePlan {
    /// The standard six-phase pipeline, checked like any other plan.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::Config` - the table breaks ordering or
    ///   disjointness (see [`PhasePlan::from_entries`])
    pub fn standard() -> Result<Self> {
        use AgentRole::*;

        let entries = vec![
            PhaseEntry::sequential(
                Phase::Requirements,
                &[ProductManager, UxResearcher, BusinessAnalyst],
            ),
            PhaseEntry::sequential(
                Phase::Architecture,
                &[SolutionsArchitect, DatabaseArchitect, SecurityArchitect],
            ),
            PhaseEntry::parallel(
                Phase::Implementation,
                &[DatabaseEngineer, BackendEngineer, FrontendEngineer],
            ),
            PhaseEntry::parallel(
                Phase::Testing,
                &[QaEngineer, E2eTestEngineer, DbTestEngineer],
            ),
            PhaseEntry::parallel(
                Phase::Review,
                &[SecurityEngineer, CodeReviewer, PerformanceEngineer],
            ),
            PhaseEntry::sequential(Phase::Deployment, &[TechnicalWriter, DevopsEngineer]),
        ];

        Self::from_entries(entries)
    }

    /// Build a plan from explicit entries.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::Config` - phases out of pipeline order or
    ///   repeated, or a role listed twice
    pub fn from_entries(entries: Vec<PhaseEntry>) -> Result<Self> {
        let mut owners = BTreeMap::new();
        let mut previous: Option<Phase> = None;

        for entry in &entries {
            if let Some(prev) = previous
                && entry.phase <= prev
            {
                return Err(OrchestratorError::Config(format!(
                    "phase plan lists '{}' after '{}'; phases must appear once, in pipeline order",
                    entry.phase, prev
                )));
            }
            previous = Some(entry.phase);

            for role in &entry.roles {
                if let Some(owner) = owners.insert(*role, entry.phase) {
                    return Err(OrchestratorError::Config(format!(
                        "role '{}' is listed in both '{}' and '{}'",
                        role, owner, entry.phase
                    )));
                }
            }
        }

        Ok(Self { entries, owners })
    }

    pub fn entries(&self) -> &[PhaseEntry] {
        &self.entries
    }

    pub fn entry(&self, phase: Phase) -> Option<&PhaseEntry> {
        self.entries.iter().find(|e| e.phase == phase)
    }

    /// Ordered roles of a phase; empty when the plan has no such phase.
    pub fn agents_for_phase(&self, phase: Phase) -> &[AgentRole] {
        self.entry(phase).map(|e| e.roles.as_slice()).unwrap_or(&[])
    }

    pub fn phase_for_agent(&self, role: AgentRole) -> Option<Phase> {
        self.owners.get(&role).copied()
    }

    pub fn is_parallel(&self, phase: Phase) -> bool {
        self.entry(phase).is_some_and(|e| e.parallel)
    }

    /// Split a phase's roles by the config's agent enablement, keeping order.
    pub fn roster(&self, phase: Phase, config: &Config) -> PhaseRoster {
        let (enabled, disabled) = self
            .agents_for_phase(phase)
            .iter()
            .partition(|role| config.is_agent_enabled(**role));
        PhaseRoster { enabled, disabled }
    }

    /// Check that every registered role belongs to a phase.
    ///
    /// Roles the plan names without a registration are allowed here; they
    /// abort the workflow when dispatched.
    pub fn validate(&self, directory: &AgentDirectory) -> Result<()> {
        let orphans: Vec<String> = directory
            .roles()
            .filter(|role| !self.owners.contains_key(role))
            .map(|role| role.to_string())
            .collect();

        if !orphans.is_empty() {
            return Err(OrchestratorError::Config(format!(
                "registered agent(s) not assigned to any phase: {}",
                orphans.join(", ")
            )));
        }
        Ok(())
    }
}
