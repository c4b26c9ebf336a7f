//! Site configuration toggling for tools with `configManagement`
//!
//! Configurations live in the tool's available directory and are enabled
//! by a symlink in its enabled directory. Apache manages the symlinks with
//! `a2ensite`/`a2dissite`; everything else gets `ln -sf`/`rm -f`. The
//! owning service is reloaded afterwards in the same fail-fast batch.
//!
//! Reading a configuration needs no privileges. Saving stages the content
//! in a temp file owned by the caller and copies it into place with sudo.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use super::authorize;
use crate::catalog::{Catalog, ConfigManagement, Tool};
use crate::error::{
    Result, file_read_failed, file_write_failed, invalid_config_name, no_config_management,
    unknown_tool,
};
use crate::privilege::{CommandResult, Credential, PrivilegedExecutor};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    pub name: String,
    pub enabled: bool,
}

/// Names must stay inside the config directories and out of the shell.
pub fn is_valid_config_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.starts_with('-')
        && !name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\'' | '"' | '`' | '$') || c.is_control())
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn checked_name(name: &str) -> Result<&str> {
    if is_valid_config_name(name) {
        Ok(name)
    } else {
        Err(invalid_config_name(name))
    }
}

fn available_file(config: &ConfigManagement, name: &str) -> String {
    format!("{}/{}", config.available_path.trim_end_matches('/'), name)
}

fn is_enabled(config: &ConfigManagement, name: &str) -> bool {
    std::fs::symlink_metadata(Path::new(&config.enabled_path).join(name))
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

fn config_of(tool: &Tool) -> Result<&ConfigManagement> {
    tool.config_management
        .as_ref()
        .ok_or_else(|| no_config_management(&tool.id))
}

/// Commands that enable or disable `name`, then reload the service.
pub fn toggle_commands(config: &ConfigManagement, name: &str, enable: bool) -> Vec<String> {
    let available = available_file(config, name);
    let enabled = format!("{}/{}", config.enabled_path.trim_end_matches('/'), name);

    let toggle = match (config.kind.as_str(), enable) {
        ("apache", true) => format!("a2ensite {}", quote(name)),
        ("apache", false) => format!("a2dissite {}", quote(name)),
        (_, true) => format!("ln -sf {} {}", quote(&available), quote(&enabled)),
        (_, false) => format!("rm -f {}", quote(&enabled)),
    };
    vec![
        toggle,
        format!("systemctl reload {}", quote(&config.service_name)),
    ]
}

pub struct SiteOperation<'a> {
    catalog: &'a Catalog,
    executor: &'a dyn PrivilegedExecutor,
}

impl<'a> SiteOperation<'a> {
    pub fn new(catalog: &'a Catalog, executor: &'a dyn PrivilegedExecutor) -> Self {
        Self { catalog, executor }
    }

    fn tool(&self, tool_id: &str) -> Result<&'a Tool> {
        self.catalog.get(tool_id).ok_or_else(|| unknown_tool(tool_id))
    }

    /// Configurations in the available directory, sorted by name.
    pub fn list(&self, tool_id: &str) -> Result<Vec<SiteConfig>> {
        let config = config_of(self.tool(tool_id)?)?;
        let available = Path::new(&config.available_path);
        let entries = std::fs::read_dir(available)
            .map_err(|e| file_read_failed(available.display().to_string(), e.to_string()))?;

        let mut sites = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            let enabled = is_enabled(config, &name);
            sites.push(SiteConfig { name, enabled });
        }
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }

    /// Enable or disable one configuration and reload the service.
    ///
    /// Returns the per-command results; the reload is never attempted when
    /// the toggle fails.
    pub fn set_enabled(
        &self,
        tool_id: &str,
        name: &str,
        enable: bool,
        credential: &Credential,
    ) -> Result<Vec<CommandResult>> {
        let config = config_of(self.tool(tool_id)?)?;
        let name = checked_name(name)?;
        authorize(self.executor, credential)?;

        let commands = toggle_commands(config, name, enable);
        Ok(self.executor.run_sequential(&commands, credential))
    }

    /// Content of one configuration in the available directory.
    pub fn show(&self, tool_id: &str, name: &str) -> Result<String> {
        let config = config_of(self.tool(tool_id)?)?;
        let path = available_file(config, checked_name(name)?);
        std::fs::read_to_string(&path).map_err(|e| file_read_failed(path, e.to_string()))
    }

    /// Write `content` as configuration `name`, replacing any existing one.
    ///
    /// The new file is mode 644. Enabled state is left alone and the service
    /// is not reloaded.
    pub fn save(
        &self,
        tool_id: &str,
        name: &str,
        content: &str,
        credential: &Credential,
    ) -> Result<Vec<CommandResult>> {
        let config = config_of(self.tool(tool_id)?)?;
        let name = checked_name(name)?;
        authorize(self.executor, credential)?;

        let staged = stage(content)?;
        tracing::debug!(site = %name, staged = %staged.path().display(), "staged site configuration");
        let command = format!(
            "install -m 644 {} {}",
            quote(&staged.path().to_string_lossy()),
            quote(&available_file(config, name))
        );
        Ok(self.executor.run_sequential(&[command], credential))
    }

    /// Disable `name` if it is enabled, then remove its file.
    pub fn delete(
        &self,
        tool_id: &str,
        name: &str,
        credential: &Credential,
    ) -> Result<Vec<CommandResult>> {
        let config = config_of(self.tool(tool_id)?)?;
        let name = checked_name(name)?;
        authorize(self.executor, credential)?;

        let mut commands = if is_enabled(config, name) {
            toggle_commands(config, name, false)
        } else {
            Vec::new()
        };
        commands.push(format!("rm -f {}", quote(&available_file(config, name))));
        Ok(self.executor.run_sequential(&commands, credential))
    }
}

/// Content in a temp file that lives until the returned handle drops
fn stage(content: &str) -> Result<NamedTempFile> {
    let to_error = |e: std::io::Error| {
        file_write_failed(std::env::temp_dir().display().to_string(), e.to_string())
    };
    let mut file = tempfile::Builder::new()
        .prefix("devsetup-site-")
        .tempfile()
        .map_err(to_error)?;
    file.write_all(content.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)?;
    Ok(file)
}
