use clap::Parser;

/// Arguments for the add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Add a repository:\n    skillsync add https://github.com/owner/repo\n\n\
                  Add one folder of a repository:\n    skillsync add https://github.com/owner/repo/tree/main/skills\n\n\
                  Add over SSH:\n    skillsync add git@github.com:owner/repo.git\n\n\
                  Add a skills.sh skill:\n    skillsync add https://skills.sh/owner/repo/pdf-tools\n\n\
                  Add a local folder:\n    skillsync add ./my-skills")]
pub struct AddArgs {
    /// Repository URL, folder URL, skills.sh link or local path
    pub input: String,

    /// Register without syncing
    #[arg(long)]
    pub no_sync: bool,
}

/// Arguments for the remove command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Source id, unique id prefix or URI
    pub source: String,
}

/// Arguments for the sources command
#[derive(Parser, Debug)]
pub struct SourcesArgs {
    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Sync every source:\n    skillsync sync\n\n\
                  Sync one source:\n    skillsync sync 3f2a9c")]
pub struct SyncArgs {
    /// Source id, unique id prefix or URI (defaults to all sources)
    pub source: Option<String>,

    /// Do not re-materialize enabled skills afterwards
    #[arg(long)]
    pub no_apply: bool,
}
