//! Validate command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::{Context, print_json};
use crate::cli::ValidateArgs;
use crate::error::Result;
use crate::resolver::{Resolver, ValidationReport};

/// Run validate command; exits non-zero when the catalog has errors.
pub fn run(globals: &GlobalArgs, args: ValidateArgs) -> Result<()> {
    let ctx = Context::load(globals)?;
    let report = Resolver::new(&ctx.catalog).validate();

    if args.json {
        print_json(&report)?;
    } else {
        display(&report, ctx.catalog.len());
    }

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn display(report: &ValidationReport, tool_count: usize) {
    for error in &report.errors {
        println!(
            "{} {}: {}",
            Style::new().red().bold().apply_to("error"),
            error.tool,
            error.error
        );
    }
    for warning in &report.warnings {
        println!(
            "{} {}: {}",
            Style::new().yellow().bold().apply_to("warning"),
            warning.tool,
            warning.warning
        );
    }

    if report.valid {
        println!(
            "{} {} tools, {} warnings",
            Style::new().green().bold().apply_to("Catalog is valid:"),
            tool_count,
            report.warnings.len()
        );
    } else {
        println!(
            "{} {} errors",
            Style::new().red().bold().apply_to("Catalog is invalid:"),
            report.errors.len()
        );
    }
}
