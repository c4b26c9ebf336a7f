//! Settings file handling
//!
//! Settings live in `config.yaml` under the user's config directory
//! (`~/.config/devsetup/` on Linux) unless a path is given explicitly.
//! A missing default file means defaults; a missing explicit file is an
//! error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::is_valid_package_name;
use crate::error::{DevsetupError, Result, config_invalid, config_parse_failed, file_read_failed};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "devsetup";

pub const SETTINGS_FILE: &str = "config.yaml";
pub const DEFAULT_CATALOG_FILE: &str = "tools.json";
pub const PROFILES_DIR: &str = "profiles";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Tool catalog path
    pub catalog: Option<PathBuf>,

    pub command_timeout_secs: u64,

    pub probe_timeout_secs: u64,

    /// Privilege-escalation program, `sudo`-compatible
    pub sudo_program: String,

    /// OS package name -> replacement package name(s)
    pub package_overrides: BTreeMap<String, String>,

    pub profiles_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: None,
            command_timeout_secs: 300,
            probe_timeout_secs: 5,
            sudo_program: "sudo".to_string(),
            package_overrides: BTreeMap::new(),
            profiles_dir: None,
        }
    }
}

/// `<config_dir>/devsetup`, if the platform has a config directory
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR))
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`, or from the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match app_config_dir() {
                Some(dir) => (dir.join(SETTINGS_FILE), false),
                None => return Ok(Self::default()),
            },
        };

        if !path.is_file() {
            if explicit {
                return Err(file_read_failed(path.display().to_string(), "file not found"));
            }
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| file_read_failed(path.display().to_string(), e.to_string()))?;
        let settings = Self::from_yaml(&content).map_err(|e| match e {
            DevsetupError::ConfigParseFailed { reason, .. } => {
                config_parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err(config_invalid("timeouts must be at least one second"));
        }
        if self.sudo_program.trim().is_empty() {
            return Err(config_invalid("sudo_program must not be empty"));
        }
        for (from, to) in &self.package_overrides {
            let names: Vec<&str> = to.split_whitespace().collect();
            if !is_valid_package_name(from)
                || names.is_empty()
                || !names.iter().all(|n| is_valid_package_name(n))
            {
                return Err(config_invalid(format!(
                    "invalid package override: '{from}' -> '{to}'"
                )));
            }
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Catalog path: the explicit one, then the settings value, then the default.
    pub fn catalog_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit.or(self.catalog.as_deref()) {
            return Ok(path.to_path_buf());
        }
        app_config_dir()
            .map(|dir| dir.join(DEFAULT_CATALOG_FILE))
            .ok_or_else(|| config_invalid("could not determine config directory; pass --catalog"))
    }

    pub fn profiles_path(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.profiles_dir {
            return Ok(dir.clone());
        }
        app_config_dir()
            .map(|dir| dir.join(PROFILES_DIR))
            .ok_or_else(|| config_invalid("could not determine config directory; set profiles_dir"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.command_timeout(), Duration::from_secs(300));
        assert_eq!(settings.probe_timeout(), Duration::from_secs(5));
        assert_eq!(settings.sudo_program, "sudo");
    }

    #[test]
    fn test_from_yaml_partial() {
        let settings = Settings::from_yaml(
            "catalog: /opt/tools.yaml\npackage_overrides:\n  docker.io: docker-ce\n",
        )
        .unwrap();
        assert_eq!(settings.catalog, Some(PathBuf::from("/opt/tools.yaml")));
        assert_eq!(settings.package_overrides["docker.io"], "docker-ce");
        assert_eq!(settings.command_timeout_secs, 300);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_field() {
        let result = Settings::from_yaml("catalgo: /x\n");
        assert!(matches!(result, Err(DevsetupError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_from_yaml_rejects_bad_override() {
        let result = Settings::from_yaml("package_overrides:\n  git: \"git; reboot\"\n");
        assert!(matches!(result, Err(DevsetupError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_from_yaml_rejects_zero_timeout() {
        let result = Settings::from_yaml("command_timeout_secs: 0\n");
        assert!(matches!(result, Err(DevsetupError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Settings::load(Some(&temp.path().join("nope.yaml")));
        assert!(matches!(result, Err(DevsetupError::FileReadFailed { .. })));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "command_timeout_secs: [1, 2]\n").unwrap();

        match Settings::load(Some(&path)) {
            Err(DevsetupError::ConfigParseFailed { path: reported, .. }) => {
                assert!(reported.ends_with("config.yaml"));
            }
            other => panic!("expected ConfigParseFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_catalog_path_precedence() {
        let settings = Settings {
            catalog: Some(PathBuf::from("/from/settings.json")),
            ..Settings::default()
        };
        assert_eq!(
            settings.catalog_path(Some(Path::new("/explicit.json"))).unwrap(),
            PathBuf::from("/explicit.json")
        );
        assert_eq!(
            settings.catalog_path(None).unwrap(),
            PathBuf::from("/from/settings.json")
        );
    }
}
