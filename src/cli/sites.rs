use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Arguments for the sites command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List nginx sites:\n    devsetup sites list nginx\n\n\
                  Enable a site:\n    devsetup sites enable nginx blog.conf\n\n\
                  Replace a site's content:\n    devsetup sites save nginx blog.conf ./blog.conf\n\n\
                  Disable an Apache site:\n    devsetup sites disable apache 000-default.conf")]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesSubcommand,
}

/// Sites subcommands
#[derive(Subcommand, Debug)]
pub enum SitesSubcommand {
    /// List available site configurations and whether they are enabled
    List(SiteListArgs),

    /// Enable a site configuration and reload the service
    Enable(SiteToggleArgs),

    /// Disable a site configuration and reload the service
    Disable(SiteToggleArgs),

    /// Print a site configuration
    Show(SiteShowArgs),

    /// Write a site configuration from a file
    Save(SiteSaveArgs),

    /// Disable a site configuration if needed and delete it
    Delete(SiteDeleteArgs),
}

#[derive(Parser, Debug)]
pub struct SiteListArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct SiteToggleArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Configuration file name
    pub name: String,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Parser, Debug)]
pub struct SiteShowArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Configuration file name
    pub name: String,
}

#[derive(Parser, Debug)]
pub struct SiteSaveArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Configuration file name
    pub name: String,

    /// File holding the new content
    pub file: PathBuf,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Parser, Debug)]
pub struct SiteDeleteArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Configuration file name
    pub name: String,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cli_parsing_sites_enable() {
        let cli = Cli::try_parse_from(["devsetup", "sites", "enable", "nginx", "blog"]).unwrap();
        match cli.command {
            Commands::Sites(SitesArgs {
                command: SitesSubcommand::Enable(args),
            }) => {
                assert_eq!(args.tool, "nginx");
                assert_eq!(args.name, "blog");
            }
            _ => panic!("Expected sites enable"),
        }
    }

    #[test]
    fn test_cli_parsing_sites_list() {
        let cli = Cli::try_parse_from(["devsetup", "sites", "list", "apache"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Sites(SitesArgs {
                command: SitesSubcommand::List(_)
            })
        ));
    }

    #[test]
    fn test_cli_parsing_sites_save() {
        let cli = Cli::try_parse_from([
            "devsetup",
            "sites",
            "save",
            "nginx",
            "blog",
            "./blog.conf",
            "--password-stdin",
        ])
        .unwrap();
        match cli.command {
            Commands::Sites(SitesArgs {
                command: SitesSubcommand::Save(args),
            }) => {
                assert_eq!(args.file, PathBuf::from("./blog.conf"));
                assert!(args.password_stdin);
            }
            _ => panic!("Expected sites save"),
        }
    }

    #[test]
    fn test_cli_parsing_sites_save_requires_file() {
        assert!(Cli::try_parse_from(["devsetup", "sites", "save", "nginx", "blog"]).is_err());
    }
}
