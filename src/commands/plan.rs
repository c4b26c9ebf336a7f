//! Plan command implementation
//!
//! Resolves a selection the way install would, without a credential and
//! without touching the system.

use console::Style;
use serde::Serialize;

use super::GlobalArgs;
use super::helpers::{Context, print_json};
use crate::cli::PlanArgs;
use crate::error::Result;
use crate::resolver::{Conflict, Resolver};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan<'a> {
    install_order: Vec<&'a str>,
    conflicts: Vec<Conflict>,
    suggestions: Vec<&'a str>,
}

/// Run plan command
pub fn run(globals: &GlobalArgs, args: PlanArgs) -> Result<()> {
    let ctx = Context::load(globals)?;
    let resolver = Resolver::new(&ctx.catalog);
    let selected = resolver.select(&args.tools)?;
    let resolution = resolver.resolve(&selected);

    let plan = Plan {
        install_order: resolution.install_order_ids(),
        suggestions: resolver
            .suggest_additional_tools(&selected)
            .iter()
            .map(|t| t.id.as_str())
            .collect(),
        conflicts: resolution.conflicts,
    };

    if args.json {
        print_json(&plan)?;
    } else {
        display(&plan);
    }

    if !plan.conflicts.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn display(plan: &Plan) {
    if !plan.conflicts.is_empty() {
        println!("{}", Style::new().bold().red().apply_to("Conflicting selection:"));
        for conflict in &plan.conflicts {
            println!("  {} {}", Style::new().red().apply_to("✗"), conflict.reason);
        }
        return;
    }

    println!("{}", Style::new().bold().apply_to("Install order:"));
    for (i, id) in plan.install_order.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, id);
    }
    if !plan.suggestions.is_empty() {
        println!();
        println!(
            "{} {}",
            Style::new().dim().apply_to("Pulled in as dependencies:"),
            plan.suggestions.join(", ")
        );
    }
}
