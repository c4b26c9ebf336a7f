//! Sites command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::{
    Context, confirm, finish, print_command_results, print_json, read_credential,
};
use crate::cli::{SiteDeleteArgs, SiteSaveArgs, SiteToggleArgs, SitesArgs, SitesSubcommand};
use crate::error::{Result, file_read_failed};
use crate::operations::SiteOperation;
use crate::privilege::CommandResult;

/// Run sites command
pub fn run(globals: &GlobalArgs, args: SitesArgs) -> Result<()> {
    match args.command {
        SitesSubcommand::List(list) => {
            let ctx = Context::load(globals)?;
            let executor = ctx.executor();
            let sites = SiteOperation::new(&ctx.catalog, &executor).list(&list.tool)?;
            if list.json {
                return print_json(&sites);
            }
            if sites.is_empty() {
                println!("No configurations found for {}.", list.tool);
            }
            for site in &sites {
                let state = if site.enabled {
                    Style::new().green().apply_to("enabled")
                } else {
                    Style::new().dim().apply_to("disabled")
                };
                println!("  {:<40} {}", site.name, state);
            }
            Ok(())
        }
        SitesSubcommand::Enable(toggle) => set_enabled(globals, &toggle, true),
        SitesSubcommand::Disable(toggle) => set_enabled(globals, &toggle, false),
        SitesSubcommand::Show(show) => {
            let ctx = Context::load(globals)?;
            let executor = ctx.executor();
            let content =
                SiteOperation::new(&ctx.catalog, &executor).show(&show.tool, &show.name)?;
            print!("{content}");
            Ok(())
        }
        SitesSubcommand::Save(save_args) => save(globals, &save_args),
        SitesSubcommand::Delete(delete_args) => delete(globals, &delete_args),
    }
}

fn save(globals: &GlobalArgs, args: &SiteSaveArgs) -> Result<()> {
    let result = Context::load(globals).and_then(|ctx| {
        let content = std::fs::read_to_string(&args.file)
            .map_err(|e| file_read_failed(args.file.display().to_string(), e.to_string()))?;
        let credential = read_credential(args.password_stdin)?;
        let executor = ctx.executor();
        SiteOperation::new(&ctx.catalog, &executor).save(
            &args.tool,
            &args.name,
            &content,
            &credential,
        )
    });
    finish(
        result,
        false,
        |results: &Vec<CommandResult>| results.iter().all(|r| r.success),
        |results| print_command_results(results),
    )
}

fn delete(globals: &GlobalArgs, args: &SiteDeleteArgs) -> Result<()> {
    let result = Context::load(globals).and_then(|ctx| {
        if !confirm(&format!("Delete {}?", args.name), args.yes)? {
            println!("Cancelled.");
            std::process::exit(0);
        }
        let credential = read_credential(args.password_stdin)?;
        let executor = ctx.executor();
        SiteOperation::new(&ctx.catalog, &executor).delete(&args.tool, &args.name, &credential)
    });
    finish(
        result,
        false,
        |results: &Vec<CommandResult>| results.iter().all(|r| r.success),
        |results| print_command_results(results),
    )
}

fn set_enabled(globals: &GlobalArgs, args: &SiteToggleArgs, enable: bool) -> Result<()> {
    let result = Context::load(globals).and_then(|ctx| {
        let credential = read_credential(args.password_stdin)?;
        let executor = ctx.executor();
        SiteOperation::new(&ctx.catalog, &executor).set_enabled(
            &args.tool,
            &args.name,
            enable,
            &credential,
        )
    });
    finish(
        result,
        false,
        |results: &Vec<CommandResult>| results.iter().all(|r| r.success),
        |results| print_command_results(results),
    )
}
