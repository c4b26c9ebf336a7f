//! Uninstall operation
//!
//! Removes a single tool. Reverse dependencies are not removed with it;
//! callers that care can ask the resolver first.

use super::{ToolResult, authorize};
use crate::backend::PackageBackend;
use crate::catalog::Catalog;
use crate::error::{Result, tool_not_installed, unknown_tool};
use crate::privilege::{Credential, OutputChunk, PrivilegedExecutor};
use crate::progress::{ProgressEvent, ProgressSink, ProgressStatus};

pub struct UninstallOperation<'a> {
    catalog: &'a Catalog,
    executor: &'a dyn PrivilegedExecutor,
    backend: &'a dyn PackageBackend,
}

impl<'a> UninstallOperation<'a> {
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

    /// Remove `tool_id`'s packages.
    ///
    /// A tool that is not installed is an error and nothing runs. A removal
    /// that fails is reported in the returned result.
    pub fn execute(
        &self,
        tool_id: &str,
        credential: &Credential,
        sink: &mut dyn ProgressSink,
    ) -> Result<ToolResult> {
        let tool = self.catalog.get(tool_id).ok_or_else(|| unknown_tool(tool_id))?;
        authorize(self.executor, credential)?;

        let packages = self.backend.effective_packages(&tool.package);
        if !self.backend.is_installed(&packages) {
            return Err(tool_not_installed(tool_id));
        }

        sink.event(&ProgressEvent::new(
            &tool.id,
            ProgressStatus::Uninstalling,
            0,
            1,
            format!("Uninstalling {}...", tool.name),
        ));

        let mut on_chunk = |chunk: &OutputChunk| sink.output(&chunk.data);
        let removed = self.backend.remove(&packages, credential, &mut on_chunk);

        let result = match removed {
            Ok(()) => ToolResult {
                tool_id: tool.id.clone(),
                name: tool.name.clone(),
                success: true,
                message: format!("Successfully uninstalled {}", packages.join(" ")),
            },
            Err(e) => {
                tracing::warn!(tool = %tool.id, error = %e, "uninstall failed");
                ToolResult {
                    tool_id: tool.id.clone(),
                    name: tool.name.clone(),
                    success: false,
                    message: e.to_string(),
                }
            }
        };

        let (status, message) = if result.success {
            (ProgressStatus::Completed, format!("{} uninstalled successfully", tool.name))
        } else {
            (ProgressStatus::Failed, format!("Failed to uninstall {}", tool.name))
        };
        sink.event(&ProgressEvent::new(&tool.id, status, 1, 1, message));
        sink.finish();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;
    use crate::catalog::Tool;
    use crate::error::DevsetupError;
    use crate::privilege::testing::ScriptedExecutor;
    use crate::progress::testing::RecordingSink;

    fn catalog() -> Catalog {
        Catalog::from_tools(vec![
            Tool::new("git", "Git", "git"),
            Tool::new("python", "Python", "python3 python3-pip"),
        ])
        .unwrap()
    }

    #[test]
    fn test_uninstall_installed_tool() {
        let catalog = catalog();
        let executor = ScriptedExecutor::accepting("pw");
        let backend = FakeBackend::with_installed(&["python3", "python3-pip"]);
        let mut sink = RecordingSink::default();

        let op = UninstallOperation::new(&catalog, &executor, &backend);
        let result = op.execute("python", &Credential::new("pw"), &mut sink).unwrap();

        assert!(result.success);
        assert_eq!(backend.calls(), vec!["remove python3 python3-pip"]);
        assert_eq!(
            sink.statuses(),
            vec![
                ("python".to_string(), ProgressStatus::Uninstalling),
                ("python".to_string(), ProgressStatus::Completed),
            ]
        );
    }

    #[test]
    fn test_uninstall_not_installed() {
        let catalog = catalog();
        let executor = ScriptedExecutor::accepting("pw");
        let backend = FakeBackend::default();
        let mut sink = RecordingSink::default();

        let op = UninstallOperation::new(&catalog, &executor, &backend);
        let result = op.execute("git", &Credential::new("pw"), &mut sink);

        assert!(matches!(result, Err(DevsetupError::ToolNotInstalled { .. })));
        assert!(backend.calls().is_empty());
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_uninstall_bad_credential() {
        let catalog = catalog();
        let executor = ScriptedExecutor::accepting("pw");
        let backend = FakeBackend::with_installed(&["git"]);
        let mut sink = RecordingSink::default();

        let op = UninstallOperation::new(&catalog, &executor, &backend);
        let result = op.execute("git", &Credential::new("nope"), &mut sink);

        assert!(matches!(result, Err(DevsetupError::InvalidCredential)));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_uninstall_failure_is_a_result() {
        let catalog = catalog();
        let executor = ScriptedExecutor::accepting("pw");
        let backend = FakeBackend::with_installed(&["git"]).breaking("git");
        let mut sink = RecordingSink::default();

        let op = UninstallOperation::new(&catalog, &executor, &backend);
        let result = op.execute("git", &Credential::new("pw"), &mut sink).unwrap();

        assert!(!result.success);
        assert_eq!(sink.events.last().map(|e| e.status), Some(ProgressStatus::Failed));
    }

    #[test]
    fn test_uninstall_unknown_tool() {
        let catalog = catalog();
        let executor = ScriptedExecutor::accepting("pw");
        let backend = FakeBackend::default();
        let mut sink = RecordingSink::default();

        let op = UninstallOperation::new(&catalog, &executor, &backend);
        assert!(matches!(
            op.execute("ghost", &Credential::new("pw"), &mut sink),
            Err(DevsetupError::UnknownTool { .. })
        ));
    }
}
