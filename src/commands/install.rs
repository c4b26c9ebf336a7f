//! Install command implementation
//!
//! The selection is resolved once up front so conflicts are reported
//! without asking for a password. The install operation then repeats the
//! checks with the credential in hand.

use console::Style;

use super::GlobalArgs;
use super::helpers::{Context, confirm, finish, read_credential};
use crate::cli::InstallArgs;
use crate::error::Result;
use crate::operations::install::ConflictReport;
use crate::operations::{InstallOperation, InstallOutcome, InstallSummary};
use crate::profiles::ProfileStore;
use crate::progress::{JsonLinesSink, ProgressDisplay, ProgressSink};
use crate::resolver::Resolver;
use crate::resolver::conflicts::summarize;

/// Run install command
pub fn run(globals: &GlobalArgs, args: InstallArgs) -> Result<()> {
    let json = args.json;
    let result = prepare_and_install(globals, &args);
    finish(result, json, InstallOutcome::success, display)
}

fn prepare_and_install(globals: &GlobalArgs, args: &InstallArgs) -> Result<InstallOutcome> {
    let ctx = Context::load(globals)?;

    let tool_ids = match &args.profile {
        Some(id) => {
            let store = ProfileStore::new(ctx.settings.profiles_path()?);
            store.get(id)?.tools
        }
        None => args.tools.clone(),
    };

    let resolver = Resolver::new(&ctx.catalog);
    let selected = resolver.select(&tool_ids)?;
    let preview = resolver.resolve(&selected);
    if preview.is_blocked() {
        return Ok(InstallOutcome::ConflictBlocked(ConflictReport {
            success: false,
            conflicts: preview.conflicts,
        }));
    }

    if !args.json {
        println!(
            "{} {}",
            Style::new().bold().apply_to("Install order:"),
            preview.install_order_ids().join(" -> ")
        );
    }
    let prompt = format!("Install {} tools?", preview.install_order.len());
    if !confirm(&prompt, args.yes || args.json)? {
        println!("Cancelled.");
        std::process::exit(0);
    }

    let credential = read_credential(args.password_stdin)?;
    let executor = ctx.executor();
    let backend = ctx.backend(&executor);

    let mut sink: Box<dyn ProgressSink> = if args.json {
        Box::new(JsonLinesSink::new(std::io::stderr()))
    } else {
        Box::new(ProgressDisplay::new(preview.install_order.len() as u64))
    };

    let mut operation = InstallOperation::new(&ctx.catalog, &executor, &backend);
    operation.execute(&tool_ids, &credential, sink.as_mut())
}

fn display(outcome: &InstallOutcome) {
    match outcome {
        InstallOutcome::ConflictBlocked(report) => {
            println!(
                "{} {}",
                Style::new().bold().red().apply_to("Tool conflicts detected:"),
                summarize(&report.conflicts)
            );
            println!("Nothing was installed.");
        }
        InstallOutcome::Completed(summary) => display_summary(summary),
    }
}

fn display_summary(summary: &InstallSummary) {
    for result in summary.results.iter().filter(|r| !r.success) {
        println!(
            "  {} {}: {}",
            Style::new().red().apply_to("✗"),
            result.name,
            result.message
        );
    }
    let headline = format!(
        "{} installed, {} failed",
        summary.installed_count, summary.failed_count
    );
    if summary.success {
        println!("{}", Style::new().green().bold().apply_to(headline));
    } else {
        println!("{}", Style::new().red().bold().apply_to(headline));
    }
}
