//! Privileged command execution errors

use super::{DevsetupError, impl_error_constructors};

impl_error_constructors!({
    SpawnFailed as spawn_failed(command, reason),
    PackageOperationFailed as package_failed(package, reason),
});

/// Timeout error for `command` after `timeout`.
pub fn timed_out(command: impl Into<String>, timeout: std::time::Duration) -> DevsetupError {
    DevsetupError::CommandTimedOut {
        command: command.into(),
        timeout_secs: timeout.as_secs(),
    }
}
