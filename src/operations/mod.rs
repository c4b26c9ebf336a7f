//! Operations that change the system
//!
//! This module provides the high-level operations:
//! - [`InstallOperation`]: resolve a selection and install it tool by tool
//! - [`UninstallOperation`]: remove one installed tool
//! - [`ExtrasOperation`]: add and remove a tool's extra modules
//! - [`SiteOperation`]: manage a tool's site configurations
//! - [`ServiceOperation`]: query and control a tool's service
//! - [`doctor`]: host readiness checks
//! - [`status`]: installed state of catalog tools
//!
//! Every operation that touches the system checks the credential before
//! its first privileged action. Nothing is rolled back: packages installed
//! before a failure stay installed.

pub mod doctor;
pub mod extras;
pub mod install;
pub mod services;
pub mod sites;
pub mod status;
pub mod uninstall;

pub use extras::{ExtraAction, ExtraResult, ExtrasOperation};
pub use install::{InstallOperation, InstallOutcome, InstallSummary};
pub use services::{ServiceAction, ServiceOperation, ServiceStatus};
pub use sites::{SiteConfig, SiteOperation};
pub use uninstall::UninstallOperation;

use serde::Serialize;

use crate::error::{DevsetupError, Result};
use crate::privilege::{Credential, PrivilegedExecutor};

/// Outcome for one tool of an install or uninstall
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub tool_id: String,
    pub name: String,
    pub success: bool,
    pub message: String,
}

/// Reject a missing credential, then verify it with the executor.
pub(crate) fn authorize(executor: &dyn PrivilegedExecutor, credential: &Credential) -> Result<()> {
    if credential.is_empty() {
        return Err(DevsetupError::MissingCredential);
    }
    if !executor.verify_credential(credential) {
        tracing::warn!("credential rejected");
        return Err(DevsetupError::InvalidCredential);
    }
    Ok(())
}
