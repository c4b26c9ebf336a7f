use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    devsetup completions bash > ~/.bash_completion.d/devsetup\n\n\
                  Generate zsh completions:\n    devsetup completions zsh > ~/.zfunc/_devsetup\n\n\
                  Generate fish completions:\n    devsetup completions fish > ~/.config/fish/completions/devsetup.fish")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(value_enum, ignore_case = true)]
    pub shell: Shell,
}
