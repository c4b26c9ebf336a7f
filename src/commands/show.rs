//! Show command implementation

use console::Style;
use serde::Serialize;

use super::GlobalArgs;
use super::helpers::{Context, print_json};
use crate::catalog::Tool;
use crate::cli::ShowArgs;
use crate::error::{Result, unknown_tool};
use crate::resolver::Resolver;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDetails<'a> {
    #[serde(flatten)]
    tool: &'a Tool,
    all_dependencies: Vec<&'a str>,
    required_by: Vec<&'a str>,
    in_cycle: bool,
}

/// Run show command
pub fn run(globals: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let ctx = Context::load(globals)?;
    let resolver = Resolver::new(&ctx.catalog);
    let tool = ctx
        .catalog
        .get(&args.tool)
        .ok_or_else(|| unknown_tool(&args.tool))?;

    let details = ToolDetails {
        tool,
        all_dependencies: resolver
            .all_dependencies(tool)
            .iter()
            .map(|t| t.id.as_str())
            .collect(),
        required_by: resolver
            .reverse_dependencies(&tool.id)
            .iter()
            .map(|t| t.id.as_str())
            .collect(),
        in_cycle: resolver.has_circular_dependency(tool),
    };

    if args.json {
        return print_json(&details);
    }

    display(&details);
    Ok(())
}

fn display(details: &ToolDetails) {
    let bold = Style::new().bold();
    let tool = details.tool;

    println!("{}", Style::new().bold().yellow().apply_to(&tool.name));
    println!("  {} {}", bold.apply_to("Id:"), tool.id);
    println!("  {} {}", bold.apply_to("Packages:"), tool.package);
    if let Some(description) = &tool.description {
        println!("  {} {}", bold.apply_to("Description:"), description);
    }
    if let Some(version) = &tool.version {
        println!("  {} {}", bold.apply_to("Version:"), version);
    }
    if let Some(website) = &tool.website {
        println!("  {} {}", bold.apply_to("Website:"), website);
    }
    if details.in_cycle {
        println!(
            "  {} dependency chain is circular; run 'devsetup validate'",
            Style::new().yellow().bold().apply_to("warning:")
        );
    }
    print_list("Depends on:", &tool.dependencies.iter().map(String::as_str).collect::<Vec<_>>());
    print_list("All dependencies:", &details.all_dependencies);
    print_list("Required by:", &details.required_by);
    print_list("Conflicts with:", &tool.conflicts.iter().map(String::as_str).collect::<Vec<_>>());
    if let Some(command) = &tool.post_install {
        println!("  {} {}", bold.apply_to("Post-install:"), command);
    }
    if !tool.extras.is_empty() {
        println!("  {}", bold.apply_to("Extras:"));
        for extra in &tool.extras {
            println!("    {} {} ({})", extra.id, extra.name, extra.package);
        }
    }
    if let Some(config) = &tool.config_management {
        println!(
            "  {} {} sites in {}",
            bold.apply_to("Configuration:"),
            config.kind,
            config.available_path
        );
    }
}

fn print_list(label: &str, items: &[&str]) {
    if !items.is_empty() {
        println!("  {} {}", Style::new().bold().apply_to(label), items.join(", "));
    }
}
