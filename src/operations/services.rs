//! Service control for tools with `configManagement`
//!
//! Status is read without privileges. Start, stop and restart go through
//! the privileged executor after the credential is verified.

use std::process::{Command, Stdio};

use serde::Serialize;

use super::authorize;
use crate::catalog::{Catalog, ConfigManagement};
use crate::error::{Result, no_config_management, unknown_tool};
use crate::privilege::{CommandResult, Credential, PrivilegedExecutor};

const SYSTEMCTL: &str = "systemctl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub tool_id: String,
    pub service: String,
    /// `systemctl is-active` output; `inactive` when it fails or is missing
    pub state: String,
}

impl ServiceStatus {
    pub fn is_active(&self) -> bool {
        self.state == "active"
    }
}

/// Ask `program is-active <service>` for the service state.
fn query_state(program: &str, service: &str) -> String {
    let output = Command::new(program)
        .args(["is-active", service])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => {
            let state = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if state.is_empty() { "active".to_string() } else { state }
        }
        Ok(_) => "inactive".to_string(),
        Err(e) => {
            tracing::debug!(program, error = %e, "service state unavailable");
            "inactive".to_string()
        }
    }
}

pub struct ServiceOperation<'a> {
    catalog: &'a Catalog,
    executor: &'a dyn PrivilegedExecutor,
    systemctl: String,
}

impl<'a> ServiceOperation<'a> {
    pub fn new(catalog: &'a Catalog, executor: &'a dyn PrivilegedExecutor) -> Self {
        Self {
            catalog,
            executor,
            systemctl: SYSTEMCTL.to_string(),
        }
    }

    /// Use `program` instead of `systemctl` for status queries
    #[cfg(test)]
    fn with_systemctl(mut self, program: &str) -> Self {
        self.systemctl = program.to_string();
        self
    }

    fn config(&self, tool_id: &str) -> Result<&'a ConfigManagement> {
        let tool = self.catalog.get(tool_id).ok_or_else(|| unknown_tool(tool_id))?;
        tool.config_management
            .as_ref()
            .ok_or_else(|| no_config_management(&tool.id))
    }

    pub fn status(&self, tool_id: &str) -> Result<ServiceStatus> {
        let config = self.config(tool_id)?;
        Ok(ServiceStatus {
            tool_id: tool_id.to_string(),
            service: config.service_name.clone(),
            state: query_state(&self.systemctl, &config.service_name),
        })
    }

    /// Start, stop or restart the tool's service.
    pub fn control(
        &self,
        tool_id: &str,
        action: ServiceAction,
        credential: &Credential,
    ) -> Result<Vec<CommandResult>> {
        let config = self.config(tool_id)?;
        authorize(self.executor, credential)?;

        let command = format!(
            "{SYSTEMCTL} {} '{}'",
            action.as_str(),
            config.service_name.replace('\'', r"'\''")
        );
        tracing::info!(service = %config.service_name, action = action.as_str(), "service control");
        Ok(self.executor.run_sequential(&[command], credential))
    }
}
