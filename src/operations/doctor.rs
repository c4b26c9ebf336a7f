//! Host readiness checks
//!
//! Nothing here needs privileges: programs are looked up on `PATH`, free
//! space comes from `df` and connectivity from a single ping.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;

/// Below this much free space on `/` the disk check fails
const MIN_FREE_KB: u64 = 1024 * 1024;
const PING_TARGET: &str = "8.8.8.8";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemCheck {
    pub platform: bool,
    pub apt: bool,
    pub sudo: bool,
    pub disk_space: bool,
    #[serde(rename = "freeSpaceGB")]
    pub free_space_gb: Option<f64>,
    /// `None` when the network check was skipped
    pub internet: Option<bool>,
    pub all_passed: bool,
}

/// Whether `program` is an existing file, or a file in one of `path`'s directories
pub fn find_program(program: &str, path: Option<&OsStr>) -> bool {
    if program.contains('/') {
        return Path::new(program).is_file();
    }
    path.is_some_and(|dirs| std::env::split_paths(dirs).any(|dir| dir.join(program).is_file()))
}

/// Available kilobytes from `df -Pk` output
pub fn parse_df_available_kb(output: &str) -> Option<u64> {
    output.lines().nth(1)?.split_whitespace().nth(3)?.parse().ok()
}

fn free_space_kb() -> Option<u64> {
    let output = Command::new("df")
        .args(["-Pk", "/"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| tracing::debug!(error = %e, "df unavailable"))
        .ok()?;
    parse_df_available_kb(&String::from_utf8_lossy(&output.stdout))
}

fn can_reach_internet() -> bool {
    Command::new("ping")
        .args(["-c", "1", "-W", "2", PING_TARGET])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

pub struct SystemChecker {
    sudo_program: String,
    check_network: bool,
}

impl SystemChecker {
    pub fn new(sudo_program: impl Into<String>) -> Self {
        Self {
            sudo_program: sudo_program.into(),
            check_network: true,
        }
    }

    pub fn skip_network(mut self, skip: bool) -> Self {
        self.check_network = !skip;
        self
    }

    pub fn run(&self) -> SystemCheck {
        let path = std::env::var_os("PATH");
        let free_kb = free_space_kb();
        let free_space_gb =
            free_kb.map(|kb| (kb as f64 / MIN_FREE_KB as f64 * 100.0).round() / 100.0);
        let internet = self.check_network.then(can_reach_internet);

        let mut check = SystemCheck {
            platform: cfg!(target_os = "linux"),
            apt: find_program("apt-get", path.as_deref()),
            sudo: find_program(&self.sudo_program, path.as_deref()),
            disk_space: free_kb.is_some_and(|kb| kb > MIN_FREE_KB),
            free_space_gb,
            internet,
            all_passed: false,
        };
        check.all_passed = check.platform
            && check.apt
            && check.sudo
            && check.disk_space
            && check.internet.unwrap_or(true);
        tracing::debug!(?check, "system check");
        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DF_OUTPUT: &str = "\
Filesystem     1024-blocks      Used Available Capacity Mounted on
/dev/nvme0n1p2   479151816 210380488 244360452      47% /
";

    #[test]
    fn test_parse_df_available_kb() {
        assert_eq!(parse_df_available_kb(DF_OUTPUT), Some(244_360_452));
        assert_eq!(parse_df_available_kb("Filesystem 1024-blocks Used Available\n"), None);
        assert_eq!(parse_df_available_kb(""), None);
        assert_eq!(
            parse_df_available_kb("header\n/dev/sda1 100 50 lots 50% /\n"),
            None
        );
    }

    #[test]
    fn test_find_program_on_path() {
        let bin = TempDir::new().unwrap();
        std::fs::write(bin.path().join("apt-get"), "").unwrap();
        let path = std::env::join_paths([Path::new("/nonexistent"), bin.path()]).unwrap();

        assert!(find_program("apt-get", Some(path.as_os_str())));
        assert!(!find_program("sudo", Some(path.as_os_str())));
        assert!(!find_program("apt-get", None));
    }

    #[test]
    fn test_find_program_by_path() {
        let bin = TempDir::new().unwrap();
        let script = bin.path().join("fake-sudo");
        std::fs::write(&script, "").unwrap();

        assert!(find_program(&script.to_string_lossy(), None));
        assert!(!find_program(&bin.path().join("missing").to_string_lossy(), None));
    }

    #[test]
    fn test_skipped_network_does_not_fail_the_check() {
        let check = SystemChecker::new("/nonexistent/sudo").skip_network(true).run();
        assert_eq!(check.internet, None);
        assert!(!check.sudo);
        assert!(!check.all_passed);
    }

    #[test]
    fn test_serialized_keys() {
        let check = SystemCheck {
            platform: true,
            apt: true,
            sudo: true,
            disk_space: true,
            free_space_gb: Some(233.04),
            internet: None,
            all_passed: true,
        };
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["diskSpace"], true);
        assert_eq!(json["freeSpaceGB"], 233.04);
        assert_eq!(json["allPassed"], true);
        assert!(json["internet"].is_null());
    }
}
