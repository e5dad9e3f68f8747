//! sdlc: multi-agent orchestrator for the software development lifecycle.
//!
//! This is the main entry point for the `sdlc` CLI. It parses arguments,
//! installs logging, dispatches to the appropriate command handler, and maps
//! errors to exit codes.

mod agent;
mod cli;
mod commands;
mod config;
mod engine;
mod error;
mod exit_codes;
mod fs;
mod llm;
mod plan;
mod workflow;
mod workspace;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.global.verbose);

    match commands::dispatch(cli).await {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "sdlc=debug"
    } else {
        "sdlc=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}
