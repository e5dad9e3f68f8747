//! Command implementations for sdlc.
//!
//! This module routes CLI commands to their implementations and builds the
//! effective config (file values, then command-line overrides).

mod agents;
mod config_cmd;
mod run;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::config::Config;
use crate::error::Result;
use crate::exit_codes;
use crate::workflow::WorkflowMode;

/// Dispatch a command to its implementation.
///
/// Returns the process exit code for commands that complete; errors are
/// mapped to exit codes by the caller.
pub async fn dispatch(cli: Cli) -> Result<i32> {
    let config = effective_config(&cli.global)?;

    match cli.command {
        Command::Full(args) => {
            run::cmd_run(config, &cli.global, args.to_request(), WorkflowMode::Full).await
        }
        Command::FromSpec(args) => {
            run::cmd_run(
                config,
                &cli.global,
                args.to_request(),
                WorkflowMode::FromExistingSpec,
            )
            .await
        }
        Command::Phase(args) => {
            run::cmd_run(
                config,
                &cli.global,
                args.request.to_request(),
                WorkflowMode::SinglePhase(args.phase),
            )
            .await
        }
        Command::Agent(args) => {
            run::cmd_run(
                config,
                &cli.global,
                args.request.to_request(),
                WorkflowMode::SingleAgent(args.role),
            )
            .await
        }
        Command::Agents => agents::cmd_agents(&config).map(|()| exit_codes::SUCCESS),
        Command::Config => config_cmd::cmd_config(&config).map(|()| exit_codes::SUCCESS),
    }
}

/// Load the config file and apply command-line overrides.
pub(crate) fn effective_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::resolve(global.config.as_deref())?;

    if let Some(dir) = &global.workspace_dir {
        config.workspace_dir = dir.clone();
    }
    if let Some(project) = &global.project {
        config.target_project_path = project.clone();
    }
    if let Some(max) = global.max_parallel {
        config.max_parallel_agents = max;
    }
    for phase in &global.skip_phases {
        config.set_phase_enabled(*phase, false);
    }
    for role in &global.disabled_agents {
        config.set_agent_enabled(*role, false);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrchestratorError;
    use crate::workflow::{AgentRole, Phase};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_apply_over_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sdlc.yaml");
        std::fs::write(
            &config_path,
            "workspace_dir: ./from-file\nmax_parallel_agents: 4\nagent_max_retries: 1\n",
        )
        .unwrap();

        let global = GlobalArgs {
            config: Some(config_path),
            workspace_dir: Some(PathBuf::from("/tmp/override")),
            max_parallel: Some(2),
            ..GlobalArgs::default()
        };
        let config = effective_config(&global).unwrap();

        assert_eq!(config.workspace_dir, PathBuf::from("/tmp/override"));
        assert_eq!(config.max_parallel_agents, 2);
        assert_eq!(config.agent_max_retries, 1);
    }

    #[test]
    fn test_toggles_disable_phases_and_agents() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sdlc.yaml");
        std::fs::write(&config_path, "phases:\n  review: true\n").unwrap();

        let global = GlobalArgs {
            config: Some(config_path),
            skip_phases: vec![Phase::Review],
            disabled_agents: vec![AgentRole::TechnicalWriter],
            ..GlobalArgs::default()
        };
        let config = effective_config(&global).unwrap();

        assert!(!config.is_phase_enabled(Phase::Review));
        assert!(config.is_phase_enabled(Phase::Testing));
        assert!(!config.is_agent_enabled(AgentRole::TechnicalWriter));
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sdlc.yaml");
        std::fs::write(&config_path, "").unwrap();

        let global = GlobalArgs {
            config: Some(config_path),
            max_parallel: Some(0),
            ..GlobalArgs::default()
        };
        let err = effective_config(&global).unwrap_err();
        assert!(matches!(err, OrchestratorError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            config: Some(temp_dir.path().join("absent.yaml")),
            ..GlobalArgs::default()
        };
        assert!(effective_config(&global).is_err());
    }
}
