//! Command helper utilities

use std::io::BufRead;

use console::Style;
use serde::Serialize;

use super::GlobalArgs;
use crate::backend::AptBackend;
use crate::catalog::{Catalog, loader};
use crate::config::Settings;
use crate::error::{DevsetupError, Result, io_error};
use crate::privilege::{CommandResult, Credential, SudoExecutor};
use crate::profiles::ProfileStore;

/// Settings plus the catalog they point at
pub struct Context {
    pub settings: Settings,
    pub catalog: Catalog,
}

impl Context {
    pub fn load(globals: &GlobalArgs) -> Result<Self> {
        let settings = Settings::load(globals.config.as_deref())?;
        let path = settings.catalog_path(globals.catalog.as_deref())?;
        let catalog = loader::load_catalog(&path)?;
        Ok(Self { settings, catalog })
    }

    pub fn executor(&self) -> SudoExecutor {
        SudoExecutor::new(&self.settings.sudo_program)
            .with_timeouts(self.settings.command_timeout(), self.settings.probe_timeout())
    }

    pub fn backend<'a>(&self, executor: &'a SudoExecutor) -> AptBackend<'a> {
        AptBackend::new(executor).with_overrides(self.settings.package_overrides.clone())
    }
}

pub fn profile_store(globals: &GlobalArgs) -> Result<ProfileStore> {
    let settings = Settings::load(globals.config.as_deref())?;
    Ok(ProfileStore::new(settings.profiles_path()?))
}

/// Read the sudo password from stdin's first line, or prompt for it.
pub fn read_credential(from_stdin: bool) -> Result<Credential> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| io_error(format!("Failed to read password from stdin: {e}")))?;
        let secret = line.trim_end_matches(['\n', '\r']);
        return Ok(Credential::new(secret));
    }

    let secret = inquire::Password::new("sudo password:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Hidden)
        .prompt()?;
    Ok(Credential::new(secret))
}

/// Ask for confirmation unless `yes` was given.
pub fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(inquire::Confirm::new(message).with_default(true).prompt()?)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io_error(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// One line per command of a privileged batch
pub fn print_command_results(results: &[CommandResult]) {
    for r in results {
        if r.success {
            println!("  {} {}", Style::new().green().apply_to("✓"), r.command);
        } else {
            println!(
                "  {} {}: {}",
                Style::new().red().apply_to("✗"),
                r.command,
                r.error.as_deref().unwrap_or("failed")
            );
        }
    }
}

/// `{"success": false, "error": ...}` for `--json` callers
pub fn print_json_error(err: &DevsetupError) -> Result<()> {
    print_json(&serde_json::json!({
        "success": false,
        "error": err.to_string(),
    }))
}

/// Report `result` as JSON or pass it through, exiting non-zero on failure.
pub fn finish<T: Serialize>(
    result: Result<T>,
    json: bool,
    succeeded: impl Fn(&T) -> bool,
    render: impl Fn(&T),
) -> Result<()> {
    match result {
        Ok(value) => {
            if json {
                print_json(&value)?;
            } else {
                render(&value);
            }
            if !succeeded(&value) {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) if json => {
            print_json_error(&e)?;
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}
