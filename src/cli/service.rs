use clap::{Parser, Subcommand};

/// Arguments for the service command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show whether nginx is running:\n    devsetup service status nginx\n\n\
                  Restart it:\n    devsetup service restart nginx")]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub command: ServiceSubcommand,
}

/// Service subcommands
#[derive(Subcommand, Debug)]
pub enum ServiceSubcommand {
    /// Show the state of a tool's service
    Status(ServiceStatusArgs),

    /// Start a tool's service
    Start(ServiceControlArgs),

    /// Stop a tool's service
    Stop(ServiceControlArgs),

    /// Restart a tool's service
    Restart(ServiceControlArgs),
}

#[derive(Parser, Debug)]
pub struct ServiceStatusArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ServiceControlArgs {
    /// Tool id (e.g. nginx)
    pub tool: String,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cli_parsing_service_restart() {
        let cli = Cli::try_parse_from(["devsetup", "service", "restart", "nginx", "--password-stdin"])
            .unwrap();
        match cli.command {
            Commands::Service(ServiceArgs {
                command: ServiceSubcommand::Restart(args),
            }) => {
                assert_eq!(args.tool, "nginx");
                assert!(args.password_stdin);
            }
            _ => panic!("Expected service restart"),
        }
    }

    #[test]
    fn test_cli_parsing_service_requires_action() {
        assert!(Cli::try_parse_from(["devsetup", "service", "nginx"]).is_err());
    }
}
