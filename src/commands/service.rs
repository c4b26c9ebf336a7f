//! Service command implementation

use console::Style;

use super::GlobalArgs;
use super::helpers::{Context, finish, print_command_results, print_json, read_credential};
use crate::cli::{ServiceArgs, ServiceControlArgs, ServiceSubcommand};
use crate::error::Result;
use crate::operations::{ServiceAction, ServiceOperation};
use crate::privilege::CommandResult;

/// Run service command
pub fn run(globals: &GlobalArgs, args: ServiceArgs) -> Result<()> {
    match args.command {
        ServiceSubcommand::Status(status_args) => {
            let ctx = Context::load(globals)?;
            let executor = ctx.executor();
            let status =
                ServiceOperation::new(&ctx.catalog, &executor).status(&status_args.tool)?;
            if status_args.json {
                return print_json(&status);
            }
            let state = if status.is_active() {
                Style::new().green().apply_to(status.state.as_str())
            } else {
                Style::new().yellow().apply_to(status.state.as_str())
            };
            println!("{}: {state}", status.service);
            Ok(())
        }
        ServiceSubcommand::Start(a) => control(globals, &a, ServiceAction::Start),
        ServiceSubcommand::Stop(a) => control(globals, &a, ServiceAction::Stop),
        ServiceSubcommand::Restart(a) => control(globals, &a, ServiceAction::Restart),
    }
}

fn control(globals: &GlobalArgs, args: &ServiceControlArgs, action: ServiceAction) -> Result<()> {
    let result = Context::load(globals).and_then(|ctx| {
        let credential = read_credential(args.password_stdin)?;
        let executor = ctx.executor();
        ServiceOperation::new(&ctx.catalog, &executor).control(&args.tool, action, &credential)
    });
    finish(
        result,
        false,
        |results: &Vec<CommandResult>| results.iter().all(|r| r.success),
        |results| print_command_results(results),
    )
}
