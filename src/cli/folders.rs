use clap::Parser;

/// Arguments for the folders command
#[derive(Parser, Debug)]
pub struct FoldersArgs {
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// A destination folder name
#[derive(Parser, Debug)]
pub struct FolderArgs {
    /// Folder name inside the skills destination
    pub name: String,
}

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a managed folder:\n    skillsync uninstall pdf-tools\n\n\
                  Remove a protected folder:\n    skillsync uninstall my-notes --force")]
pub struct UninstallArgs {
    /// Folder name inside the skills destination
    pub name: String,

    /// Also remove protected folders
    #[arg(long, short = 'f')]
    pub force: bool,
}
