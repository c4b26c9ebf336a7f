//! Error types and handling for devsetup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`catalog`]: Tool catalog loading and integrity errors
//! - [`request`]: Malformed install/uninstall requests
//! - [`exec`]: Privileged command execution errors
//! - [`fs`]: File system errors
//! - [`config`]: Settings file errors
//! - [`profile`]: Saved profile errors

/// Generates `fn name(field: impl Into<String>, ..) -> DevsetupError` constructors
/// for variants whose fields are all strings.
macro_rules! impl_error_constructors {
    ({ $($variant:ident as $fn_name:ident($($field:ident),*)),* $(,)? }) => {
        $(
            pub fn $fn_name($($field: impl Into<String>),*) -> DevsetupError {
                DevsetupError::$variant { $($field: $field.into()),* }
            }
        )*
    };
}

pub(crate) use impl_error_constructors;

pub mod catalog;
pub mod config;
pub mod exec;
pub mod fs;
pub mod profile;
pub mod request;

pub use catalog::{
    duplicate_id as duplicate_tool_id, invalid as catalog_invalid,
    invalid_package as invalid_package_name, not_found as catalog_not_found,
    parse_failed as catalog_parse_failed,
};
pub use config::{invalid as config_invalid, parse_failed as config_parse_failed};
pub use exec::{package_failed as package_operation_failed, spawn_failed};
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};
pub use profile::{invalid as profile_invalid, not_found as profile_not_found};
pub use request::{
    invalid_config_name, no_config_management, not_installed as tool_not_installed,
    unknown_extra, unknown_tool,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for devsetup operations
#[derive(Error, Diagnostic, Debug)]
pub enum DevsetupError {
    // Catalog errors
    #[error("Tool catalog not found: {path}")]
    #[diagnostic(
        code(devsetup::catalog::not_found),
        help("Pass --catalog <path>, set DEVSETUP_CATALOG, or set `catalog` in the settings file")
    )]
    CatalogNotFound { path: String },

    #[error("Failed to parse tool catalog: {path}: {reason}")]
    #[diagnostic(code(devsetup::catalog::parse_failed))]
    CatalogParseFailed { path: String, reason: String },

    #[error("Invalid tool catalog: {message}")]
    #[diagnostic(code(devsetup::catalog::invalid))]
    CatalogInvalid { message: String },

    #[error("Duplicate tool id in catalog: {id}")]
    #[diagnostic(
        code(devsetup::catalog::duplicate_id),
        help("Tool ids must be unique across all categories")
    )]
    DuplicateToolId { id: String },

    #[error("Tool '{tool}' declares an invalid package name: '{package}'")]
    #[diagnostic(
        code(devsetup::catalog::invalid_package),
        help("Package names may only contain letters, digits and . + : _ -")
    )]
    InvalidPackageName { tool: String, package: String },

    // Request errors
    #[error("No tools selected")]
    #[diagnostic(code(devsetup::request::empty_selection), help("Select at least one tool"))]
    EmptySelection,

    #[error("Tool '{id}' not found in catalog")]
    #[diagnostic(
        code(devsetup::request::unknown_tool),
        help("Run 'devsetup list' to see available tools")
    )]
    UnknownTool { id: String },

    #[error("Tool '{tool}' has no extra module '{extra}'")]
    #[diagnostic(code(devsetup::request::unknown_extra))]
    UnknownExtra { tool: String, extra: String },

    #[error("Tool '{id}' is not installed")]
    #[diagnostic(code(devsetup::request::not_installed))]
    ToolNotInstalled { id: String },

    #[error("Tool '{tool}' has no configuration management")]
    #[diagnostic(code(devsetup::request::no_config_management))]
    NoConfigManagement { tool: String },

    #[error("Invalid configuration name: '{name}'")]
    #[diagnostic(
        code(devsetup::request::invalid_config_name),
        help("Configuration names must not contain path separators or quotes")
    )]
    InvalidConfigName { name: String },

    // Credential errors
    #[error("Password is required for privileged operations")]
    #[diagnostic(code(devsetup::credential::missing))]
    MissingCredential,

    #[error("Invalid sudo password")]
    #[diagnostic(
        code(devsetup::credential::invalid),
        help("The password was rejected by sudo; nothing was changed")
    )]
    InvalidCredential,

    // Execution errors
    #[error("Failed to start command `{command}`: {reason}")]
    #[diagnostic(code(devsetup::exec::spawn_failed))]
    SpawnFailed { command: String, reason: String },

    #[error("Command `{command}` exited with {}", describe_exit(.exit_code))]
    #[diagnostic(code(devsetup::exec::command_failed))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Command `{command}` timed out after {timeout_secs}s")]
    #[diagnostic(code(devsetup::exec::timed_out))]
    CommandTimedOut { command: String, timeout_secs: u64 },

    #[error("Package operation failed for '{package}': {reason}")]
    #[diagnostic(code(devsetup::exec::package_failed))]
    PackageOperationFailed { package: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(devsetup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(devsetup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(devsetup::fs::io_error))]
    IoError { message: String },

    // Settings errors
    #[error("Failed to parse settings file: {path}")]
    #[diagnostic(code(devsetup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid settings: {message}")]
    #[diagnostic(code(devsetup::config::invalid))]
    ConfigInvalid { message: String },

    // Profile errors
    #[error("Profile '{id}' not found")]
    #[diagnostic(
        code(devsetup::profile::not_found),
        help("Run 'devsetup profile list' to see saved profiles")
    )]
    ProfileNotFound { id: String },

    #[error("Invalid profile: {message}")]
    #[diagnostic(code(devsetup::profile::invalid))]
    ProfileInvalid { message: String },
}

#[allow(clippy::ref_option)]
fn describe_exit(exit_code: &Option<i32>) -> String {
    exit_code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

impl From<std::io::Error> for DevsetupError {
    fn from(err: std::io::Error) -> Self {
        DevsetupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for DevsetupError {
    fn from(err: serde_yaml::Error) -> Self {
        DevsetupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DevsetupError {
    fn from(err: serde_json::Error) -> Self {
        DevsetupError::CatalogParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for DevsetupError {
    fn from(err: inquire::InquireError) -> Self {
        DevsetupError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, DevsetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_display() {
        let err = unknown_tool("nginx");
        assert_eq!(err.to_string(), "Tool 'nginx' not found in catalog");
    }

    #[test]
    fn test_error_code() {
        let err = unknown_tool("nginx");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("devsetup::request::unknown_tool".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DevsetupError = io_err.into();
        assert!(matches!(err, DevsetupError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid json content");
        let err: DevsetupError = parse_result.unwrap_err().into();
        assert!(matches!(err, DevsetupError::CatalogParseFailed { .. }));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse_result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content: [unclosed");
        let err: DevsetupError = parse_result.unwrap_err().into();
        assert!(matches!(err, DevsetupError::ConfigParseFailed { .. }));
    }

    test_error_contains!(
        test_invalid_credential_error,
        DevsetupError::InvalidCredential,
        "Invalid sudo password"
    );

    test_error_contains!(
        test_empty_selection_error,
        DevsetupError::EmptySelection,
        "No tools selected"
    );

    test_error_contains!(
        test_command_failed_with_code,
        DevsetupError::CommandFailed {
            command: "apt-get install -y git".to_string(),
            exit_code: Some(100),
            stdout: String::new(),
            stderr: "E: Unable to locate package".to_string(),
        },
        "apt-get install -y git",
        "code 100"
    );

    test_error_contains!(
        test_command_failed_by_signal,
        DevsetupError::CommandFailed {
            command: "sleep 10".to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        },
        "a signal"
    );

    test_error_contains!(
        test_command_timed_out,
        DevsetupError::CommandTimedOut {
            command: "apt-get update".to_string(),
            timeout_secs: 300,
        },
        "timed out after 300s"
    );

    #[test]
    fn test_catalog_constructors() {
        let err = duplicate_tool_id("git");
        assert!(matches!(err, DevsetupError::DuplicateToolId { .. }));
        assert!(err.to_string().contains("Duplicate tool id"));

        let err = invalid_package_name("evil", "git; rm -rf /");
        assert!(matches!(err, DevsetupError::InvalidPackageName { .. }));
        assert!(err.to_string().contains("evil"));

        let err = catalog_parse_failed("/etc/tools.json", "missing field `id`");
        assert!(err.to_string().contains("missing field `id`"));
    }

    #[test]
    fn test_profile_not_found() {
        let err = profile_not_found("web-stack");
        assert!(matches!(err, DevsetupError::ProfileNotFound { .. }));
        assert!(err.to_string().contains("web-stack"));
    }
}
