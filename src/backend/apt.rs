//! Debian/Ubuntu backend: `dpkg-query` for status, `apt-get` for changes

use std::collections::BTreeMap;
use std::process::Command;

use super::PackageBackend;
use crate::catalog::{PackageSpec, is_valid_package_name};
use crate::error::{DevsetupError, Result, package_operation_failed};
use crate::privilege::{Credential, OutputChunk, PrivilegedExecutor, RunOptions};

const INSTALLED_STATUS: &str = "install ok installed";

pub struct AptBackend<'a> {
    executor: &'a dyn PrivilegedExecutor,
    overrides: BTreeMap<String, String>,
}

impl<'a> AptBackend<'a> {
    pub fn new(executor: &'a dyn PrivilegedExecutor) -> Self {
        Self {
            executor,
            overrides: BTreeMap::new(),
        }
    }

    /// Replace package names, e.g. `docker.io` -> `docker-ce` on hosts
    /// using Docker's own repository.
    pub fn with_overrides(mut self, overrides: BTreeMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    fn run(
        &self,
        command: &str,
        credential: &Credential,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<()> {
        self.executor
            .run_streaming(command, credential, &RunOptions::default(), &mut |chunk| {
                tracing::trace!(output = %chunk.data.trim_end(), "apt");
                on_chunk(chunk);
            })
            .map(|_| ())
    }
}

fn checked_list(packages: &[String]) -> Result<String> {
    if let Some(bad) = packages.iter().find(|p| !is_valid_package_name(p)) {
        return Err(package_operation_failed(bad, "invalid package name"));
    }
    Ok(packages.join(" "))
}

pub(crate) fn install_command(list: &str) -> String {
    format!("DEBIAN_FRONTEND=noninteractive apt-get install -y {list}")
}

pub(crate) fn remove_command(list: &str) -> String {
    format!("DEBIAN_FRONTEND=noninteractive apt-get remove -y {list}")
}

/// `dpkg-query -W -f='${Status}\n'` prints one status line per package.
fn all_installed(status_output: &str, expected: usize) -> bool {
    let lines: Vec<&str> = status_output.lines().filter(|l| !l.trim().is_empty()).collect();
    lines.len() == expected && lines.iter().all(|l| l.trim() == INSTALLED_STATUS)
}

/// Short reason for a failed package-manager command
fn failure_reason(err: &DevsetupError) -> String {
    match err {
        DevsetupError::CommandFailed { stderr, .. } => {
            let last = stderr.lines().rev().find(|l| !l.trim().is_empty());
            last.map_or_else(|| err.to_string(), |l| l.trim().to_string())
        }
        other => other.to_string(),
    }
}

impl PackageBackend for AptBackend<'_> {
    fn effective_packages(&self, spec: &PackageSpec) -> Vec<String> {
        spec.names()
            .into_iter()
            .flat_map(|name| match self.overrides.get(&name) {
                Some(replacement) => replacement
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
                None => vec![name],
            })
            .collect()
    }

    fn is_installed(&self, packages: &[String]) -> bool {
        if packages.is_empty() {
            return false;
        }
        let output = Command::new("dpkg-query")
            .arg("-W")
            .arg("-f=${Status}\n")
            .args(packages)
            .output();

        match output {
            Ok(out) if out.status.success() => {
                all_installed(&String::from_utf8_lossy(&out.stdout), packages.len())
            }
            Ok(_) => false,
            Err(e) => {
                tracing::debug!(error = %e, "dpkg-query unavailable");
                false
            }
        }
    }

    fn install(
        &self,
        packages: &[String],
        credential: &Credential,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<()> {
        let list = checked_list(packages)?;

        if let Err(e) = self.run("apt-get update", credential, on_chunk) {
            tracing::warn!(error = %e, "apt-get update failed, continuing with install");
        }

        self.run(&install_command(&list), credential, on_chunk)
            .map_err(|e| package_operation_failed(&list, failure_reason(&e)))?;

        if self.is_installed(packages) {
            Ok(())
        } else {
            Err(package_operation_failed(
                list,
                "apt-get finished but the package is not installed",
            ))
        }
    }

    fn remove(
        &self,
        packages: &[String],
        credential: &Credential,
        on_chunk: &mut dyn FnMut(&OutputChunk),
    ) -> Result<()> {
        let list = checked_list(packages)?;

        self.run(&remove_command(&list), credential, on_chunk)
            .map_err(|e| package_operation_failed(&list, failure_reason(&e)))?;

        if self.is_installed(packages) {
            Err(package_operation_failed(
                list,
                "apt-get finished but the package is still installed",
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::testing::ScriptedExecutor;

    #[test]
    fn test_effective_packages_applies_overrides() {
        let executor = ScriptedExecutor::accepting("pw");
        let overrides = BTreeMap::from([("docker.io".to_string(), "docker-ce docker-ce-cli".to_string())]);
        let backend = AptBackend::new(&executor).with_overrides(overrides);

        let spec = PackageSpec::from("git docker.io");
        assert_eq!(
            backend.effective_packages(&spec),
            vec!["git", "docker-ce", "docker-ce-cli"]
        );
    }

    #[test]
    fn test_all_installed() {
        let ok = "install ok installed\ninstall ok installed\n";
        assert!(all_installed(ok, 2));
        assert!(!all_installed(ok, 3));
        assert!(!all_installed("deinstall ok config-files\n", 1));
        assert!(!all_installed("", 1));
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            install_command("git curl"),
            "DEBIAN_FRONTEND=noninteractive apt-get install -y git curl"
        );
        assert_eq!(
            remove_command("git"),
            "DEBIAN_FRONTEND=noninteractive apt-get remove -y git"
        );
    }

    #[test]
    fn test_install_rejects_unsafe_names_before_running() {
        let executor = ScriptedExecutor::accepting("pw");
        let backend = AptBackend::new(&executor);

        let result = backend.install(
            &["git; rm -rf /".to_string()],
            &Credential::new("pw"),
            &mut |_| {},
        );
        assert!(matches!(result, Err(DevsetupError::PackageOperationFailed { .. })));
        assert!(executor.commands().is_empty());
    }

    #[test]
    fn test_install_tolerates_update_failure() {
        let executor = ScriptedExecutor::accepting("pw").fail_on("apt-get update", 100);
        let backend = AptBackend::new(&executor);

        // The package will not show as installed on the test host, so only
        // the command sequence is checked here
        let _ = backend.install(&["devsetup-nonexistent-pkg".to_string()], &Credential::new("pw"), &mut |_| {});
        assert_eq!(
            executor.commands(),
            vec![
                "apt-get update".to_string(),
                install_command("devsetup-nonexistent-pkg"),
            ]
        );
    }

    #[test]
    fn test_install_failure_reason_is_last_stderr_line() {
        let executor = ScriptedExecutor::accepting("pw")
            .fail_on(&install_command("devsetup-nonexistent-pkg"), 100);
        let backend = AptBackend::new(&executor);

        let result = backend.install(
            &["devsetup-nonexistent-pkg".to_string()],
            &Credential::new("pw"),
            &mut |_| {},
        );
        match result {
            Err(DevsetupError::PackageOperationFailed { reason, .. }) => {
                assert_eq!(reason, "scripted failure");
            }
            other => panic!("expected PackageOperationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_of_absent_package_succeeds() {
        let executor = ScriptedExecutor::accepting("pw");
        let backend = AptBackend::new(&executor);

        backend
            .remove(&["devsetup-nonexistent-pkg".to_string()], &Credential::new("pw"), &mut |_| {})
            .unwrap();
        assert_eq!(executor.commands(), vec![remove_command("devsetup-nonexistent-pkg")]);
    }
}
