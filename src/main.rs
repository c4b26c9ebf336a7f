//! devsetup - developer tool installer
//!
//! Installs developer tools described in a catalog on apt-based systems,
//! resolving dependencies and refusing conflicting selections before any
//! privileged command runs.

use clap::Parser;

mod backend;
mod catalog;
mod cli;
mod commands;
mod config;
mod error;
mod operations;
mod privilege;
mod profiles;
mod progress;
mod resolver;

use cli::{Cli, Commands};
use commands::GlobalArgs;

const LOG_ENV: &str = "DEVSETUP_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "devsetup=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let globals = GlobalArgs {
        catalog: cli.catalog,
        config: cli.config,
    };

    let result = match cli.command {
        Commands::List(args) => commands::list::run(&globals, args),
        Commands::Show(args) => commands::show::run(&globals, args),
        Commands::Plan(args) => commands::plan::run(&globals, args),
        Commands::Validate(args) => commands::validate::run(&globals, args),
        Commands::Graph(args) => commands::graph::run(&globals, args),
        Commands::Install(args) => commands::install::run(&globals, args),
        Commands::Uninstall(args) => commands::uninstall::run(&globals, args),
        Commands::Extras(args) => commands::extras::run(&globals, args),
        Commands::Sites(args) => commands::sites::run(&globals, args),
        Commands::Service(args) => commands::service::run(&globals, args),
        Commands::Doctor(args) => commands::doctor::run(&globals, args),
        Commands::Profile(args) => commands::profile::run(&globals, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
