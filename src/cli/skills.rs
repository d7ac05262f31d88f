use clap::{Parser, Subcommand};

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List every discovered skill:\n    skillsync list\n\n\
                  List enabled skills only:\n    skillsync list --enabled")]
pub struct ListArgs {
    /// Only show enabled skills
    #[arg(long)]
    pub enabled: bool,

    /// Print JSON
    #[arg(long)]
    pub json: bool,
}

/// One or more skills, by id or slug
#[derive(Parser, Debug)]
pub struct SkillsArgs {
    /// Skill ids (source-id:path) or slugs
    #[arg(required = true, num_args = 1..)]
    pub skills: Vec<String>,
}

/// A single skill, by id or slug
#[derive(Parser, Debug)]
pub struct SkillArgs {
    /// Skill id (source-id:path) or slug
    pub skill: String,
}

/// Arguments for the defaults command
#[derive(Parser, Debug)]
pub struct DefaultsArgs {
    #[command(subcommand)]
    pub command: DefaultsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DefaultsSubcommand {
    /// Add skills to the global defaults
    Add(SkillsArgs),

    /// Remove skills from the global defaults
    Remove(SkillsArgs),

    /// Show the global defaults
    List,

    /// Enable every non-frozen default in this workspace
    Apply,
}

/// Arguments for the apply command
#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Sync every source first
    #[arg(long)]
    pub sync: bool,
}
