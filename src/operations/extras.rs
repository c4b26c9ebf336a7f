//! Extra module management for a single tool

use serde::Serialize;

use super::authorize;
use crate::backend::PackageBackend;
use crate::catalog::Catalog;
use crate::error::{Result, unknown_extra, unknown_tool};
use crate::privilege::{Credential, OutputChunk, PrivilegedExecutor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraAction {
    Install,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraResult {
    pub extra_id: String,
    pub action: ExtraAction,
    pub success: bool,
    pub message: String,
}

pub struct ExtrasOperation<'a> {
    catalog: &'a Catalog,
    executor: &'a dyn PrivilegedExecutor,
    backend: &'a dyn PackageBackend,
}

impl<'a> ExtrasOperation<'a> {
    pub fn new(
        catalog: &'a Catalog,
        executor: &'a dyn PrivilegedExecutor,
        backend: &'a dyn PackageBackend,
    ) -> Self {
        Self {
            catalog,
            executor,
            backend,
        }
    }

    /// Apply removals, then installs, for `tool_id`'s extras.
    ///
    /// Each item succeeds or fails on its own; an unknown extra id is a
    /// failed item, not an error for the batch.
    pub fn execute(
        &self,
        tool_id: &str,
        credential: &Credential,
        install: &[String],
        remove: &[String],
        on_output: &mut dyn FnMut(&str),
    ) -> Result<Vec<ExtraResult>> {
        let tool = self.catalog.get(tool_id).ok_or_else(|| unknown_tool(tool_id))?;
        authorize(self.executor, credential)?;

        let work = remove
            .iter()
            .map(|id| (id, ExtraAction::Remove))
            .chain(install.iter().map(|id| (id, ExtraAction::Install)));

        let mut results = Vec::with_capacity(install.len() + remove.len());
        for (extra_id, action) in work {
            let mut on_chunk = |chunk: &OutputChunk| on_output(&chunk.data);
            let outcome = tool
                .extra(extra_id)
                .ok_or_else(|| unknown_extra(&tool.id, extra_id))
                .and_then(|extra| {
                    let packages = self.backend.effective_packages(&extra.package);
                    match action {
                        ExtraAction::Install => self
                            .backend
                            .install(&packages, credential, &mut on_chunk)
                            .map(|()| format!("Installed {}", extra.name)),
                        ExtraAction::Remove => self
                            .backend
                            .remove(&packages, credential, &mut on_chunk)
                            .map(|()| format!("Removed {}", extra.name)),
                    }
                });

            let result = match outcome {
                Ok(message) => ExtraResult {
                    extra_id: extra_id.clone(),
                    action,
                    success: true,
                    message,
                },
                Err(e) => {
                    tracing::warn!(tool = %tool.id, extra = %extra_id, error = %e, "extra module failed");
                    ExtraResult {
                        extra_id: extra_id.clone(),
                        action,
                        success: false,
                        message: e.to_string(),
                    }
                }
            };
            results.push(result);
        }

        Ok(results)
    }
}
