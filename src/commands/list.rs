//! List command implementation
//!
//! Lists catalog tools grouped by category, optionally with the installed
//! state reported by the package manager.

use console::Style;
use serde::Serialize;

use super::GlobalArgs;
use super::helpers::{Context, print_json};
use crate::catalog::{Catalog, Tool};
use crate::cli::ListArgs;
use crate::error::Result;
use crate::operations::status::{ToolStatus, tool_statuses};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedTool<'a> {
    category: &'a str,
    #[serde(flatten)]
    tool: &'a Tool,
}

/// Run list command
pub fn run(globals: &GlobalArgs, args: ListArgs) -> Result<()> {
    let ctx = Context::load(globals)?;

    if args.status {
        let executor = ctx.executor();
        let backend = ctx.backend(&executor);
        let statuses: Vec<ToolStatus> = tool_statuses(&ctx.catalog, &backend)
            .into_iter()
            .filter(|s| in_category(&ctx.catalog, args.category.as_deref(), &s.id))
            .collect();
        if args.json {
            return print_json(&statuses);
        }
        print_statuses(&statuses);
        return Ok(());
    }

    if args.json {
        let tools: Vec<ListedTool> = ctx
            .catalog
            .categories()
            .iter()
            .filter(|c| args.category.as_deref().is_none_or(|id| c.id == id))
            .flat_map(|c| c.tools.iter().map(|tool| ListedTool { category: &c.id, tool }))
            .collect();
        return print_json(&tools);
    }

    print_catalog(&ctx.catalog, args.category.as_deref());
    Ok(())
}

fn in_category(catalog: &Catalog, category: Option<&str>, tool_id: &str) -> bool {
    let Some(category) = category else {
        return true;
    };
    catalog
        .categories()
        .iter()
        .any(|c| c.id == category && c.tools.iter().any(|t| t.id == tool_id))
}

fn print_catalog(catalog: &Catalog, category: Option<&str>) {
    let bold = Style::new().bold();
    println!(
        "Tool catalog {} ({} tools):",
        catalog.version(),
        catalog.len()
    );
    for c in catalog
        .categories()
        .iter()
        .filter(|c| category.is_none_or(|id| c.id == id))
    {
        println!();
        println!("{}", bold.apply_to(&c.name));
        for tool in &c.tools {
            let mut line = format!(
                "  {} {}",
                Style::new().bold().yellow().apply_to(&tool.id),
                tool.name
            );
            if !tool.dependencies.is_empty() {
                line.push_str(&format!(
                    " {}",
                    Style::new().dim().apply_to(format!("(needs {})", tool.dependencies.join(", ")))
                ));
            }
            println!("{line}");
        }
    }
}

fn print_statuses(statuses: &[ToolStatus]) {
    let mut current = None;
    for status in statuses {
        if current != Some(&status.category) {
            println!();
            println!("{}", Style::new().bold().apply_to(&status.category));
            current = Some(&status.category);
        }
        let mark = if status.installed {
            Style::new().green().apply_to("installed")
        } else {
            Style::new().dim().apply_to("-")
        };
        println!(
            "  {:<20} {:<30} {}",
            status.id, status.name, mark
        );
    }
}
