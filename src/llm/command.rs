//! Subprocess-backed language model.
//!
//! The command template is rendered with `{model}`, `{temperature}`,
//! `{max_tokens}` and `{role}`, split with shell-words (no shell involved),
//! and spawned. The prompts go to stdin; stdout is the completion.

use super::{CompletionRequest, LanguageModel};
use crate::agent::prompt::{TemplateError, render_template, vars};
use crate::error::{OrchestratorError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Separator between the system and user prompt on stdin.
const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

/// Largest slice of stderr quoted back in an error.
const STDERR_TAIL: usize = 2000;

#[derive(Debug, Clone)]
pub struct CommandModel {
    template: String,
}

impl CommandModel {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render and split the command line for a request.
    fn command_line(&self, request: &CompletionRequest) -> Result<Vec<String>> {
        let variables = vars([
            ("model", request.model.clone()),
            ("temperature", request.temperature.to_string()),
            ("max_tokens", request.max_tokens.to_string()),
            ("role", request.role.to_string()),
        ]);

        let rendered = render_template(&self.template, &variables).map_err(|e| match e {
            TemplateError::UndefinedVariable { name, .. } => OrchestratorError::Config(format!(
                "model command references undefined variable '{}'\n\
                 Command: {}\n\
                 Available variables: max_tokens, model, role, temperature",
                name, self.template
            )),
            other => OrchestratorError::Config(format!("invalid model command: {}", other)),
        })?;

        let args = shell_words::split(&rendered).map_err(|e| {
            OrchestratorError::Config(format!(
                "failed to parse model command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                rendered, e
            ))
        })?;

        if args.is_empty() {
            return Err(OrchestratorError::Config(format!(
                "model command is empty after parsing: '{}'",
                rendered
            )));
        }

        Ok(args)
    }
}

#[async_trait]
impl LanguageModel for CommandModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let args = self.command_line(request)?;
        let (program, rest) = (&args[0], &args[1..]);
        debug!(role = %request.role, program = %program, "spawning model command");

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                OrchestratorError::Model(format!(
                    "failed to execute model command '{}': {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    program, e
                ))
            })?;

        let prompt = format!(
            "{}{}{}",
            request.system_prompt, PROMPT_SEPARATOR, request.user_prompt
        );
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                // Dropping stdin afterwards closes the pipe so the command sees EOF.
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
                None => Ok(()),
            }
        };

        // stdin is fed while stdout and stderr drain.
        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| {
            OrchestratorError::Model(format!("failed to wait for model command: {}", e))
        })?;

        if let Err(e) = written
            && e.kind() != ErrorKind::BrokenPipe
        {
            return Err(OrchestratorError::Model(format!(
                "failed to write prompt to model command: {}",
                e
            )));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .chars()
                .rev()
                .take(STDERR_TAIL)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return Err(OrchestratorError::Model(format!(
                "model command exited with {}: {}",
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                tail.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
