//! Uninstall command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::{Context, confirm, finish, read_credential};
use crate::cli::UninstallArgs;
use crate::error::{Result, unknown_tool};
use crate::operations::{ToolResult, UninstallOperation};
use crate::progress::{JsonLinesSink, ProgressDisplay, ProgressSink};
use crate::resolver::Resolver;

/// Run uninstall command
pub fn run(globals: &GlobalArgs, args: UninstallArgs) -> Result<()> {
    let json = args.json;
    let result = uninstall(globals, &args);
    finish(result, json, |r: &ToolResult| r.success, display)
}

fn uninstall(globals: &GlobalArgs, args: &UninstallArgs) -> Result<ToolResult> {
    let ctx = Context::load(globals)?;
    let tool = ctx
        .catalog
        .get(&args.tool)
        .ok_or_else(|| unknown_tool(&args.tool))?;

    let dependents = Resolver::new(&ctx.catalog).reverse_dependencies(&tool.id);
    if !dependents.is_empty() && !args.json {
        let names: Vec<&str> = dependents.iter().map(|t| t.name.as_str()).collect();
        println!(
            "{} {} is a dependency of: {}",
            Style::new().yellow().bold().apply_to("warning:"),
            tool.name,
            names.join(", ")
        );
    }
    if !confirm(&format!("Uninstall {}?", tool.name), args.yes || args.json)? {
        println!("Cancelled.");
        std::process::exit(0);
    }

    let credential = read_credential(args.password_stdin)?;
    let executor = ctx.executor();
    let backend = ctx.backend(&executor);
    let mut sink: Box<dyn ProgressSink> = if args.json {
        Box::new(JsonLinesSink::new(std::io::stderr()))
    } else {
        Box::new(ProgressDisplay::new(1))
    };

    UninstallOperation::new(&ctx.catalog, &executor, &backend).execute(
        &tool.id,
        &credential,
        sink.as_mut(),
    )
}

fn display(result: &ToolResult) {
    if result.success {
        println!("{} {}", Style::new().green().apply_to("✓"), result.message);
    } else {
        println!("{} {}", Style::new().red().apply_to("✗"), result.message);
    }
}
