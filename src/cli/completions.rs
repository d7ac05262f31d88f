use clap::Parser;
use clap_complete::Shell;

/// Arguments for the completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Bash:\n    skillsync completions bash > ~/.local/share/bash-completion/completions/skillsync\n\n\
                  Zsh:\n    skillsync completions zsh > ~/.zfunc/_skillsync")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(value_enum)]
    pub shell: Shell,
}
