//! Install operation
//!
//! Runs one installation batch through its states:
//!
//! ```text
//! Preparing -> Resolving -> ConflictBlocked
//!                        -> Installing -> Completed | Failed
//! ```
//!
//! Request problems (empty selection, missing or rejected credential,
//! unknown tool ids) are errors raised in `Preparing`, before anything
//! privileged runs. Conflicts end the run in `ConflictBlocked` with the
//! conflict list and no events. Once `Installing` starts every tool in the
//! install order is attempted: a failed tool is recorded and the batch
//! moves on.

use serde::Serialize;

use super::{ToolResult, authorize};
use crate::backend::PackageBackend;
use crate::catalog::{Catalog, Tool};
use crate::error::{DevsetupError, Result};
use crate::privilege::{Credential, PrivilegedExecutor, RunOptions};
use crate::progress::{ProgressEvent, ProgressSink, ProgressStatus};
use crate::resolver::{Conflict, Resolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Preparing,
    Resolving,
    ConflictBlocked,
    Installing,
    Completed,
    Failed,
}

impl std::fmt::Display for InstallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InstallState::Preparing => "preparing",
            InstallState::Resolving => "resolving",
            InstallState::ConflictBlocked => "conflict-blocked",
            InstallState::Installing => "installing",
            InstallState::Completed => "completed",
            InstallState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Aggregate result of an install batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallSummary {
    pub success: bool,
    pub results: Vec<ToolResult>,
    pub installed_count: usize,
    pub failed_count: usize,
}

impl InstallSummary {
    fn from_results(results: Vec<ToolResult>) -> Self {
        let installed_count = results.iter().filter(|r| r.success).count();
        let failed_count = results.len() - installed_count;
        Self {
            success: failed_count == 0,
            results,
            installed_count,
            failed_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub success: bool,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InstallOutcome {
    Completed(InstallSummary),
    ConflictBlocked(ConflictReport),
}

impl InstallOutcome {
    pub fn success(&self) -> bool {
        match self {
            InstallOutcome::Completed(summary) => summary.success,
            InstallOutcome::ConflictBlocked(_) => false,
        }
    }
}

pub struct InstallOperation<'a> {
    catalog: &'a Catalog,
    executor: &'a dyn PrivilegedExecutor,
    backend: &'a dyn PackageBackend,
    state: InstallState,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        catalog: &'a Catalog,
        executor: &'a dyn PrivilegedExecutor,
        backend: &'a dyn PackageBackend,
    ) -> Self {
        Self {
            catalog,
            executor,
            backend,
            state: InstallState::Preparing,
        }
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    fn transition(&mut self, state: InstallState) {
        tracing::debug!(from = %self.state, to = %state, "install state");
        self.state = state;
    }

    /// Install the tools named by `tool_ids` and everything they depend on.
    pub fn execute<S: AsRef<str>>(
        &mut self,
        tool_ids: &[S],
        credential: &Credential,
        sink: &mut dyn ProgressSink,
    ) -> Result<InstallOutcome> {
        self.state = InstallState::Preparing;
        if tool_ids.is_empty() {
            return Err(DevsetupError::EmptySelection);
        }
        if credential.is_empty() {
            return Err(DevsetupError::MissingCredential);
        }
        let resolver = Resolver::new(self.catalog);
        let selected = resolver.select(tool_ids)?;
        authorize(self.executor, credential)?;

        self.transition(InstallState::Resolving);
        let resolution = resolver.resolve(&selected);
        if resolution.is_blocked() {
            self.transition(InstallState::ConflictBlocked);
            return Ok(InstallOutcome::ConflictBlocked(ConflictReport {
                success: false,
                conflicts: resolution.conflicts,
            }));
        }

        self.transition(InstallState::Installing);
        let total = resolution.install_order.len();
        let mut results = Vec::with_capacity(total);
        for tool in resolution.install_order {
            let done = results.len();
            sink.event(&ProgressEvent::new(
                &tool.id,
                ProgressStatus::Installing,
                done,
                total,
                format!("Installing {}...", tool.name),
            ));

            let result = self.install_tool(tool, credential, sink);
            let (status, message) = if result.success {
                (ProgressStatus::Completed, format!("{} installed successfully", tool.name))
            } else {
                tracing::warn!(tool = %tool.id, reason = %result.message, "tool failed to install");
                (ProgressStatus::Failed, format!("Failed to install {}", tool.name))
            };
            sink.event(&ProgressEvent::new(&tool.id, status, done + 1, total, message));
            results.push(result);
        }
        sink.finish();

        let summary = InstallSummary::from_results(results);
        self.transition(if summary.success {
            InstallState::Completed
        } else {
            InstallState::Failed
        });
        Ok(InstallOutcome::Completed(summary))
    }

    /// Install one tool's packages, then its post-install command.
    fn install_tool(
        &self,
        tool: &Tool,
        credential: &Credential,
        sink: &mut dyn ProgressSink,
    ) -> ToolResult {
        let packages = self.backend.effective_packages(&tool.package);
        let mut on_chunk = |chunk: &crate::privilege::OutputChunk| sink.output(&chunk.data);

        let outcome = self
            .backend
            .install(&packages, credential, &mut on_chunk)
            .map(|()| format!("Successfully installed {}", packages.join(" ")))
            .and_then(|message| match &tool.post_install {
                Some(command) => self
                    .executor
                    .run_streaming(command, credential, &RunOptions::default(), &mut on_chunk)
                    .map(|_| message)
                    .inspect_err(|e| {
                        tracing::warn!(tool = %tool.id, error = %e, "post-install command failed");
                    }),
                None => Ok(message),
            });

        match outcome {
            Ok(message) => ToolResult {
                tool_id: tool.id.clone(),
                name: tool.name.clone(),
                success: true,
                message,
            },
            Err(e) => ToolResult {
                tool_id: tool.id.clone(),
                name: tool.name.clone(),
                success: false,
                message: e.to_string(),
            },
        }
    }
}
