//! Privileged command execution
//!
//! [`PrivilegedExecutor`] is the narrow capability the install operations
//! drive: run one command with elevated rights, optionally streaming its
//! output, or run a batch that stops at the first failure.
//!
//! Credentials are accepted per operation and never stored. They reach the
//! privilege-escalation program through its stdin, never through a shell
//! string.

pub mod sudo;

use std::time::Duration;

use serde::Serialize;

use crate::error::{DevsetupError, Result};

pub use sudo::SudoExecutor;

/// Privilege-escalation secret supplied per request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Stdout,
    Stderr,
}

/// A piece of output as the process produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputChunk {
    #[serde(rename = "type")]
    pub stream: StreamKind,
    pub data: String,
}

/// Captured output of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub(crate) fn push(&mut self, chunk: &OutputChunk) {
        match chunk.stream {
            StreamKind::Stdout => self.stdout.push_str(&chunk.data),
            StreamKind::Stderr => self.stderr.push_str(&chunk.data),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Overrides the executor's default command timeout
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Result of one command of a [`PrivilegedExecutor::run_sequential`] batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub command: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CommandOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    fn from_run(command: &str, result: Result<CommandOutput>) -> Self {
        match result {
            Ok(output) => Self {
                command: command.to_string(),
                success: true,
                output: Some(output),
                error: None,
            },
            Err(DevsetupError::CommandFailed {
                exit_code,
                stdout,
                stderr,
                ..
            }) => Self {
                command: command.to_string(),
                success: false,
                error: Some(format!(
                    "exited with {}",
                    exit_code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
                )),
                output: Some(CommandOutput {
                    stdout,
                    stderr,
                    exit_code,
                }),
            },
            Err(e) => Self {
                command: command.to_string(),
                success: false,
                output: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Runs commands with elevated rights
pub trait PrivilegedExecutor {
    /// Check a credential with a harmless privileged probe.
    ///
    /// Timeouts and ambiguous probe output count as invalid.
    fn verify_credential(&self, credential: &Credential) -> bool;

    /// Run `command`, handing output chunks to `on_chunk` as they arrive.
    ///
    /// Returns once the process exits. A non-zero exit is
    /// `DevsetupError::CommandFailed` carrying the output captured so far.
    fn run_streaming(
        &self,
        command: &str,
        credential: &Credential,
        options: &RunOptions,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<CommandOutput>;

    fn run(
        &self,
        command: &str,
        credential: &Credential,
        options: &RunOptions,
    ) -> Result<CommandOutput> {
        self.run_streaming(command, credential, options, &mut |_| {})
    }

    /// Run commands in order with one credential, stopping at the first
    /// failure. Commands after a failure are never attempted.
    fn run_sequential(&self, commands: &[String], credential: &Credential) -> Vec<CommandResult> {
        let mut results = Vec::with_capacity(commands.len());
        for command in commands {
            let result =
                CommandResult::from_run(command, self.run(command, credential, &RunOptions::default()));
            let failed = !result.success;
            results.push(result);
            if failed {
                tracing::debug!(command = %command, "stopping command batch after failure");
                break;
            }
        }
        results
    }
}
