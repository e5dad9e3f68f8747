//! The closed role -> capability table.
//!
//! Built once before the engine starts and never mutated afterwards. A lookup
//! for a role without a capability is a configuration error, not something
//! the engine retries.

use super::Agent;
use super::specialist::{SpecialistAgent, profile_for};
use crate::config::ModelConfig;
use crate::error::{OrchestratorError, Result};
use crate::fs::ArtifactStore;
use crate::llm::LanguageModel;
use crate::workflow::AgentRole;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Static mapping from role to capability.
#[derive(Clone)]
pub struct AgentDirectory {
    agents: BTreeMap<AgentRole, Arc<dyn Agent>>,
}

impl AgentDirectory {
    pub fn builder() -> AgentDirectoryBuilder {
        AgentDirectoryBuilder::default()
    }

    /// Directory with the standard specialist for every role.
    pub fn standard(
        settings: &ModelConfig,
        model: Arc<dyn LanguageModel>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let mut builder = Self::builder();
        for role in AgentRole::ALL {
            let agent = SpecialistAgent::new(
                profile_for(role),
                settings.clone(),
                model.clone(),
                store.clone(),
            );
            builder = builder.register(role, Arc::new(agent));
        }
        builder.build()
    }

    /// Look up the capability for a role.
    ///
    /// # Errors
    ///
    /// * `OrchestratorError::UnregisteredRole` - no capability for `role`
    pub fn resolve(&self, role: AgentRole) -> Result<Arc<dyn Agent>> {
        self.agents
            .get(&role)
            .cloned()
            .ok_or(OrchestratorError::UnregisteredRole(role))
    }

    /// Registered roles in enumeration order.
    pub fn roles(&self) -> impl Iterator<Item = AgentRole> + '_ {
        self.agents.keys().copied()
    }
}

impl fmt::Debug for AgentDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDirectory")
            .field("roles", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects registrations; the finished directory is read-only.
#[derive(Default)]
pub struct AgentDirectoryBuilder {
    agents: BTreeMap<AgentRole, Arc<dyn Agent>>,
}

impl AgentDirectoryBuilder {
    /// Register (or replace) the capability for a role.
    pub fn register(mut self, role: AgentRole, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(role, agent);
        self
    }

    pub fn build(self) -> AgentDirectory {
        AgentDirectory {
            agents: self.agents,
        }
    }
}
