//! Common test utilities for devsetup integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Two categories: web servers with a conflict pair and site management,
/// and dev tools with dependency chains.
pub const CATALOG_TEMPLATE: &str = r#"{
    "version": "1.4.0",
    "categories": [
        {
            "id": "web",
            "name": "Web servers",
            "tools": [
                {
                    "id": "nginx",
                    "name": "Nginx",
                    "package": "nginx",
                    "conflicts": ["apache"],
                    "configManagement": {
                        "type": "nginx",
                        "availablePath": "@ROOT@/sites-available",
                        "enabledPath": "@ROOT@/sites-enabled",
                        "serviceName": "nginx"
                    }
                },
                {
                    "id": "apache",
                    "name": "Apache",
                    "package": "apache2",
                    "conflicts": ["nginx"]
                }
            ]
        },
        {
            "id": "dev",
            "name": "Development",
            "tools": [
                { "id": "git", "name": "Git", "package": "git" },
                { "id": "node", "name": "Node.js", "package": ["nodejs", "npm"] },
                {
                    "id": "yarn",
                    "name": "Yarn",
                    "package": "yarnpkg",
                    "dependencies": ["node"],
                    "extras": [
                        { "id": "docs", "name": "Yarn docs", "package": "yarnpkg-doc" }
                    ]
                },
                { "id": "docker", "name": "Docker", "package": "docker.io" },
                {
                    "id": "docker-compose",
                    "name": "Docker Compose",
                    "package": "docker-compose",
                    "dependencies": ["docker"]
                }
            ]
        }
    ]
}"#;

pub const BROKEN_CATALOG: &str = r#"{
    "version": "1.0.0",
    "categories": [
        {
            "id": "dev",
            "name": "Development",
            "tools": [
                { "id": "a", "name": "A", "package": "a", "dependencies": ["b"] },
                { "id": "b", "name": "B", "package": "b", "dependencies": ["a"] },
                { "id": "c", "name": "C", "package": "c", "dependencies": ["ghost"] }
            ]
        }
    ]
}"#;

/// Accepts `hunter2`, runs `echo` probes, and logs every other command
/// instead of running it.
#[allow(dead_code)]
const FAKE_SUDO: &str = r#"#!/bin/sh
IFS= read -r pw
if [ "$pw" != "hunter2" ]; then
    echo "Sorry, try again." >&2
    exit 1
fi
while [ "$#" -gt 0 ] && [ "$1" != "--" ]; do shift; done
shift
case "$3" in
    echo*) exec "$@" ;;
esac
printf '%s\n' "$3" >> "$(dirname "$0")/sudo.log"
"#;

/// Temp directory holding a catalog, a settings file and a profiles dir
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_catalog(CATALOG_TEMPLATE)
    }

    pub fn with_catalog(catalog: &str) -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_string_lossy().into_owned();
        std::fs::write(
            temp.path().join("tools.json"),
            catalog.replace("@ROOT@", &root),
        )
        .expect("Failed to write catalog");

        let env = Self { temp };
        env.write_settings("");
        env
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.path().join("tools.json")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.path().join("profiles")
    }

    /// Write `config.yaml` with the profiles dir plus `extra` lines.
    pub fn write_settings(&self, extra: &str) {
        let settings = format!(
            "catalog: {}\nprofiles_dir: {}\n{extra}",
            self.catalog_path().display(),
            self.profiles_dir().display()
        );
        std::fs::write(self.path().join("config.yaml"), settings)
            .expect("Failed to write settings");
    }

    /// Install the fake sudo and point the settings at it.
    #[allow(dead_code)]
    #[cfg(unix)]
    pub fn use_fake_sudo(&self) {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path().join("fake-sudo");
        std::fs::write(&script, FAKE_SUDO).expect("Failed to write fake sudo");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake sudo");
        self.write_settings(&format!(
            "sudo_program: {}\nprobe_timeout_secs: 10\n",
            script.display()
        ));
    }

    /// Commands the fake sudo was asked to run
    #[allow(dead_code)]
    pub fn sudo_log(&self) -> String {
        std::fs::read_to_string(self.path().join("sudo.log")).unwrap_or_default()
    }

    /// devsetup with this env's settings and nothing inherited
    pub fn cmd(&self) -> Command {
        let mut cmd = devsetup_cmd();
        cmd.env_remove("DEVSETUP_CATALOG")
            .env_remove("DEVSETUP_LOG")
            .env("DEVSETUP_CONFIG", self.path().join("config.yaml"))
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"));
        cmd
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn devsetup_cmd() -> Command {
    Command::cargo_bin("devsetup").expect("devsetup binary")
}
