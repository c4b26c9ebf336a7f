use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install tools (dependencies are added automatically):\n    devsetup install git yarn\n\n\
                  Install a saved profile:\n    devsetup install --profile web-dev\n\n\
                  Non-interactive, with machine-readable output:\n    \
                  echo \"$PASSWORD\" | devsetup install git --password-stdin --json --yes")]
pub struct InstallArgs {
    /// Tool ids to install
    #[arg(required_unless_present = "profile", conflicts_with = "profile")]
    pub tools: Vec<String>,

    /// Install the tools of a saved profile
    #[arg(long)]
    pub profile: Option<String>,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print JSON: progress events on stderr, the result on stdout
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from(["devsetup", "install", "git", "node"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.tools, vec!["git", "node"]);
                assert_eq!(args.profile, None);
                assert!(!args.password_stdin);
                assert!(!args.yes);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_profile() {
        let cli = Cli::try_parse_from(["devsetup", "install", "--profile", "web"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert!(args.tools.is_empty());
                assert_eq!(args.profile.as_deref(), Some("web"));
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_needs_tools_or_profile() {
        assert!(Cli::try_parse_from(["devsetup", "install"]).is_err());
        assert!(Cli::try_parse_from(["devsetup", "install", "git", "--profile", "web"]).is_err());
    }
}
