//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - inspect: list, show, plan, validate and graph arguments
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - extras: Extras command arguments
//! - sites: Site configuration subcommands
//! - service: Service status and control subcommands
//! - doctor: Host readiness check arguments
//! - profile: Saved profile subcommands
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod doctor;
pub mod extras;
pub mod inspect;
pub mod install;
pub mod profile;
pub mod service;
pub mod sites;
pub mod uninstall;

pub use completions::CompletionsArgs;
pub use doctor::DoctorArgs;
pub use extras::ExtrasArgs;
pub use inspect::{GraphArgs, GraphFormat, ListArgs, PlanArgs, ShowArgs, ValidateArgs};
pub use install::InstallArgs;
pub use profile::{ProfileArgs, ProfileSubcommand};
pub use service::{ServiceArgs, ServiceControlArgs, ServiceStatusArgs, ServiceSubcommand};
pub use sites::{
    SiteDeleteArgs, SiteListArgs, SiteSaveArgs, SiteShowArgs, SiteToggleArgs, SitesArgs,
    SitesSubcommand,
};
pub use uninstall::UninstallArgs;

/// devsetup - developer tool installer
///
/// Installs developer tools from a catalog, in dependency order, refusing
/// selections that contain conflicting tools.
#[derive(Parser, Debug)]
#[command(
    name = "devsetup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install developer tools with dependency and conflict resolution",
    long_about = "devsetup installs developer tools described in a catalog. Dependencies are \
                  installed first, conflicting selections are refused before anything runs, and \
                  one failed tool never stops the rest of the batch.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  devsetup list                        \x1b[90m# Show the catalog\x1b[0m\n   \
                  devsetup plan yarn docker-compose    \x1b[90m# Show the install order\x1b[0m\n   \
                  devsetup install yarn                \x1b[90m# Install yarn and its dependencies\x1b[0m\n   \
                  devsetup install --profile web-dev   \x1b[90m# Install a saved selection\x1b[0m\n   \
                  devsetup validate                    \x1b[90m# Check the catalog for defects\x1b[0m\n   \
                  devsetup doctor                      \x1b[90m# Check this machine\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Tool catalog file (JSON or YAML)
    #[arg(long, global = true, env = "DEVSETUP_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Settings file (defaults to ~/.config/devsetup/config.yaml)
    #[arg(long, global = true, env = "DEVSETUP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog tools
    List(ListArgs),

    /// Show tool details
    Show(ShowArgs),

    /// Resolve a selection without installing anything
    Plan(PlanArgs),

    /// Check the catalog for dependency defects
    Validate(ValidateArgs),

    /// Print the dependency graph
    Graph(GraphArgs),

    /// Install tools and their dependencies
    Install(InstallArgs),

    /// Uninstall a tool
    Uninstall(UninstallArgs),

    /// Add or remove a tool's extra modules
    Extras(ExtrasArgs),

    /// Manage web server site configurations
    Sites(SitesArgs),

    /// Show or control a tool's service
    Service(ServiceArgs),

    /// Check that this machine can install tools
    Doctor(DoctorArgs),

    /// Manage saved tool selections
    Profile(ProfileArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
