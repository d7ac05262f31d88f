//! CLI definitions using clap derive API
//!
//! This module is organized into submodules by command group:
//! - sources: add, remove, sources, sync
//! - skills: list, enable, disable, freeze, unfreeze, defaults, apply
//! - folders: folders, protect, release, uninstall, update, reconcile
//! - completions: completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod folders;
pub mod skills;
pub mod sources;

pub use completions::CompletionsArgs;
pub use folders::{FolderArgs, FoldersArgs, UninstallArgs};
pub use skills::{ApplyArgs, DefaultsArgs, DefaultsSubcommand, ListArgs, SkillArgs, SkillsArgs};
pub use sources::{AddArgs, RemoveArgs, SourcesArgs, SyncArgs};

/// skillsync - keep a local skills folder in sync with skill repositories
#[derive(Parser, Debug)]
#[command(
    name = "skillsync",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Sync skill bundles from git repositories into a local skills folder",
    long_about = "skillsync registers git repositories and local folders as skill sources, \
                  keeps a cached checkout of each one current, and copies the skills you \
                  enable into the workspace's skills folder (.claude/skills by default).",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  skillsync add https://github.com/owner/repo\n    \
                  skillsync add https://github.com/owner/repo/tree/main/skills\n    \
                  skillsync list\n    \
                  skillsync enable pdf-tools\n    \
                  skillsync sync"
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "SKILLSYNC_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never prompt; pick accounts without asking
    #[arg(long, global = true)]
    pub no_input: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a skill source (repository URL, folder URL, skills.sh link or local path)
    Add(AddArgs),

    /// Unregister a source and remove everything it contributed
    Remove(RemoveArgs),

    /// List registered sources
    Sources(SourcesArgs),

    /// Clone or update source checkouts
    Sync(SyncArgs),

    /// List discovered skills
    List(ListArgs),

    /// Enable skills in this workspace
    Enable(SkillsArgs),

    /// Disable skills in this workspace
    Disable(SkillsArgs),

    /// Disable a skill and keep it from being enabled
    Freeze(SkillArgs),

    /// Allow a frozen skill to be enabled again
    Unfreeze(SkillArgs),

    /// Manage global default skills
    Defaults(DefaultsArgs),

    /// Re-materialize the enabled skills
    Apply(ApplyArgs),

    /// Show skill folders in the destination
    Folders(FoldersArgs),

    /// Protect a destination folder from automatic changes
    Protect(FolderArgs),

    /// Hand a protected folder back to skillsync
    Release(FolderArgs),

    /// Delete a folder from the destination
    Uninstall(UninstallArgs),

    /// Re-copy one managed folder from its source checkout
    Update(FolderArgs),

    /// Adopt untracked skill folders and prune stale manifest entries
    Reconcile,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
