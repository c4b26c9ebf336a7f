use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall a tool:\n    devsetup uninstall docker\n\n\
                  Uninstall without confirmation:\n    devsetup uninstall docker -y")]
pub struct UninstallArgs {
    /// Tool id to uninstall
    pub tool: String,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
