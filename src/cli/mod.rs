//! CLI argument parsing for sdlc.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::workflow::{AgentRole, FeatureRequest, Phase};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// sdlc: multi-agent SDLC orchestrator.
///
/// Runs a fixed pipeline of specialist agents (requirements, architecture,
/// implementation, testing, review, deployment) over a feature description
/// and writes their deliverables into an isolated feature workspace.
#[derive(Parser, Debug)]
#[command(name = "sdlc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: sdlc.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the workspace root directory.
    #[arg(long, global = true)]
    pub workspace_dir: Option<PathBuf>,

    /// Override the target project path handed to agents.
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Override the number of agents a parallel phase may run at once.
    #[arg(long, global = true)]
    pub max_parallel: Option<usize>,

    /// Disable a phase for this run (repeatable).
    #[arg(long = "skip-phase", global = true)]
    pub skip_phases: Vec<Phase>,

    /// Disable an agent role for this run (repeatable).
    #[arg(long = "disable-agent", global = true)]
    pub disabled_agents: Vec<AgentRole>,

    /// Print the execution record as JSON instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands for sdlc.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every phase, from requirements to deployment.
    Full(RequestArgs),

    /// Start from an existing spec, skipping the requirements phase.
    FromSpec(FromSpecArgs),

    /// Run a single phase.
    Phase(PhaseArgs),

    /// Run a single agent.
    Agent(AgentArgs),

    /// List agent roles grouped by phase.
    Agents,

    /// Print the effective configuration as YAML.
    Config,
}

/// Feature description plus optional context.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Feature description.
    pub description: String,

    /// Existing spec or PRD document.
    #[arg(long)]
    pub spec: Option<PathBuf>,

    /// User story to include (repeatable).
    #[arg(long = "story")]
    pub stories: Vec<String>,

    /// Acceptance criterion to include (repeatable).
    #[arg(long = "criterion")]
    pub criteria: Vec<String>,

    /// Package inside the target project the feature lives in.
    #[arg(long)]
    pub target_package: Option<String>,
}

impl RequestArgs {
    pub fn to_request(&self) -> FeatureRequest {
        let mut request = FeatureRequest::new(&self.description)
            .with_user_stories(self.stories.clone())
            .with_acceptance_criteria(self.criteria.clone());
        if let Some(spec) = &self.spec {
            request = request.with_spec_path(spec);
        }
        if let Some(package) = &self.target_package {
            request = request.with_target_package(package);
        }
        request
    }
}

#[derive(Args, Debug, Clone)]
pub struct FromSpecArgs {
    /// Path to the existing spec document.
    pub spec_path: PathBuf,

    /// Feature description (default: derived from the spec file name).
    #[arg(long)]
    pub description: Option<String>,
}

impl FromSpecArgs {
    pub fn to_request(&self) -> FeatureRequest {
        let description = self.description.clone().unwrap_or_else(|| {
            let name = self
                .spec_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.spec_path.display().to_string());
            format!("Feature from spec: {}", name)
        });
        FeatureRequest::new(description).with_spec_path(&self.spec_path)
    }
}

#[derive(Args, Debug, Clone)]
pub struct PhaseArgs {
    /// Phase to run (requirements, architecture, implementation, testing,
    /// review, deployment).
    pub phase: Phase,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Agent role to run (see `sdlc agents`).
    pub role: AgentRole,

    #[command(flatten)]
    pub request: RequestArgs,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
