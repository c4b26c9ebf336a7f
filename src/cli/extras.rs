use clap::Parser;

/// Arguments for the extras command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List a tool's extras:\n    devsetup extras php\n\n\
                  Add and remove extras:\n    devsetup extras php --add mysql --add curl --remove gd")]
pub struct ExtrasArgs {
    /// Tool id
    pub tool: String,

    /// Extra module to install (repeatable)
    #[arg(long = "add", value_name = "EXTRA")]
    pub add: Vec<String>,

    /// Extra module to remove (repeatable)
    #[arg(long = "remove", value_name = "EXTRA")]
    pub remove: Vec<String>,

    /// Read the sudo password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}
