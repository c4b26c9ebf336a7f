//! Extras command implementation
//!
//! Without `--add`/`--remove` this lists the tool's extras and their
//! installed state.

use console::Style;
use serde::Serialize;

use super::GlobalArgs;
use super::helpers::{Context, finish, print_json, read_credential};
use crate::backend::PackageBackend;
use crate::cli::ExtrasArgs;
use crate::error::{Result, unknown_tool};
use crate::operations::{ExtraAction, ExtraResult, ExtrasOperation};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtraStatus<'a> {
    id: &'a str,
    name: &'a str,
    installed: bool,
}

/// Run extras command
pub fn run(globals: &GlobalArgs, args: ExtrasArgs) -> Result<()> {
    let ctx = Context::load(globals)?;
    let tool = ctx
        .catalog
        .get(&args.tool)
        .ok_or_else(|| unknown_tool(&args.tool))?;
    let executor = ctx.executor();
    let backend = ctx.backend(&executor);

    if args.add.is_empty() && args.remove.is_empty() {
        let statuses: Vec<ExtraStatus> = tool
            .extras
            .iter()
            .map(|e| ExtraStatus {
                id: &e.id,
                name: &e.name,
                installed: backend.is_installed(&backend.effective_packages(&e.package)),
            })
            .collect();
        if args.json {
            return print_json(&statuses);
        }
        if statuses.is_empty() {
            println!("{} has no extra modules.", tool.name);
        }
        for s in &statuses {
            let mark = if s.installed {
                Style::new().green().apply_to("installed")
            } else {
                Style::new().dim().apply_to("-")
            };
            println!("  {:<20} {:<30} {}", s.id, s.name, mark);
        }
        return Ok(());
    }

    let json = args.json;
    let result = read_credential(args.password_stdin).and_then(|credential| {
        ExtrasOperation::new(&ctx.catalog, &executor, &backend).execute(
            &tool.id,
            &credential,
            &args.add,
            &args.remove,
            &mut |line: &str| tracing::trace!(output = %line.trim_end(), "extras"),
        )
    });
    finish(
        result,
        json,
        |results: &Vec<ExtraResult>| results.iter().all(|r| r.success),
        |results| display(results),
    )
}

fn display(results: &[ExtraResult]) {
    for r in results {
        let verb = match r.action {
            ExtraAction::Install => "install",
            ExtraAction::Remove => "remove",
        };
        let mark = if r.success {
            Style::new().green().apply_to("✓")
        } else {
            Style::new().red().apply_to("✗")
        };
        println!("  {mark} {verb} {}: {}", r.extra_id, r.message);
    }
}
