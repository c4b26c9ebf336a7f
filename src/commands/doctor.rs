//! Doctor command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::finish;
use crate::cli::DoctorArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::operations::doctor::{SystemCheck, SystemChecker};

/// Run doctor command
pub fn run(globals: &GlobalArgs, args: DoctorArgs) -> Result<()> {
    let result = Settings::load(globals.config.as_deref()).map(|settings| {
        SystemChecker::new(settings.sudo_program)
            .skip_network(args.skip_network)
            .run()
    });
    finish(result, args.json, |check: &SystemCheck| check.all_passed, display)
}

fn display(check: &SystemCheck) {
    let line = |passed: Option<bool>, label: &str| {
        let mark = match passed {
            Some(true) => Style::new().green().apply_to("✓"),
            Some(false) => Style::new().red().apply_to("✗"),
            None => Style::new().dim().apply_to("-"),
        };
        println!("  {mark} {label}");
    };

    line(Some(check.platform), "Linux");
    line(Some(check.apt), "apt-get available");
    line(Some(check.sudo), "sudo available");
    let disk = match check.free_space_gb {
        Some(gb) => format!("At least 1 GB free on / ({gb:.2} GB)"),
        None => "At least 1 GB free on / (unknown)".to_string(),
    };
    line(Some(check.disk_space), &disk);
    let internet = if check.internet.is_some() {
        "Internet reachable"
    } else {
        "Internet reachable (skipped)"
    };
    line(check.internet, internet);

    if check.all_passed {
        println!("{}", Style::new().green().bold().apply_to("All checks passed."));
    } else {
        println!("{}", Style::new().red().bold().apply_to("Some checks failed."));
    }
}
