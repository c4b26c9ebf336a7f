use clap::Parser;

/// Arguments for the doctor command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check this machine:\n    devsetup doctor\n\n\
                  Check without pinging out:\n    devsetup doctor --skip-network")]
pub struct DoctorArgs {
    /// Skip the internet connectivity check
    #[arg(long)]
    pub skip_network: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
