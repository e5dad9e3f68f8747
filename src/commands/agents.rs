//! Implementation of the `sdlc agents` command.

use crate::agent::profile_for;
use crate::config::Config;
use crate::error::Result;
use crate::plan::PhasePlan;

/// List every role grouped by phase, with enablement and dispatch policy.
pub fn cmd_agents(config: &Config) -> Result<()> {
    print!("{}", render_agents(&PhasePlan::standard()?, config));
    Ok(())
}

pub fn render_agents(plan: &PhasePlan, config: &Config) -> String {
    let mut out = String::new();
    out.push_str("Specialist Agents\n");
    out.push_str("=================\n");

    for entry in plan.entries() {
        let policy = if entry.parallel {
            "parallel"
        } else {
            "sequential"
        };
        let state = if config.is_phase_enabled(entry.phase) {
            ""
        } else {
            " [disabled]"
        };
        out.push_str(&format!(
            "\n{} ({}, {}){}:\n",
            entry.phase.title(),
            entry.phase,
            policy,
            state
        ));

        for role in &entry.roles {
            let profile = profile_for(*role);
            let marker = if config.is_agent_enabled(*role) {
                ""
            } else {
                " [disabled]"
            };
            out.push_str(&format!(
                "  - {:<22} {}{}\n",
                role.as_str(),
                profile.display_name,
                marker
            ));
        }
    }

    out
}
