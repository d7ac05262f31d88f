//! Error types and handling for skillsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructors for the variants that carry structured context live in
//! sub-modules by error domain:
//! - [`sync`]: clone/pull/checkout failures
//! - [`materialize`]: name conflicts and protected folders
//! - [`fs`]: file system errors

pub mod fs;
pub mod materialize;
pub mod sync;

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Git action a sync failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Clone,
    Pull,
    Checkout,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Clone => "clone",
            Self::Pull => "pull",
            Self::Checkout => "checkout",
        };
        f.write_str(verb)
    }
}

/// One group of desired bundles that sanitize to the same destination name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameConflict {
    /// Shared destination folder name
    pub name: String,
    /// `(slug, source path)` of every bundle competing for `name`
    pub bundles: Vec<(String, String)>,
}

fn describe_conflicts(conflicts: &[NameConflict]) -> String {
    conflicts
        .iter()
        .map(|conflict| {
            let members = conflict
                .bundles
                .iter()
                .map(|(slug, path)| format!("{slug} ({path})"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("'{}' <- {members}", conflict.name)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for skillsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SkillsyncError {
    // Reference errors
    #[error("Invalid repository reference '{input}': {reason}")]
    #[diagnostic(
        code(skillsync::reference::invalid),
        help(
            "Use a repository URL such as https://github.com/owner/repo, \
             or a folder URL such as https://github.com/owner/repo/tree/main/skills"
        )
    )]
    InvalidReference { input: String, reason: String },

    // Sync errors
    #[error("Failed to {action} {source_uri}: {cause}")]
    #[diagnostic(code(skillsync::sync::failed))]
    SyncFailed {
        action: SyncAction,
        source_uri: String,
        cause: String,
        #[help]
        remedy: Option<String>,
    },

    #[error("{failed} of {total} sources failed to sync")]
    #[diagnostic(
        code(skillsync::sync::incomplete),
        help("Run 'skillsync sync <source>' to retry a single source")
    )]
    SyncIncomplete { failed: usize, total: usize },

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(skillsync::git::operation_failed))]
    GitOperationFailed { message: String },

    // Source errors
    #[error("Source '{id}' not found")]
    #[diagnostic(
        code(skillsync::source::not_found),
        help("Run 'skillsync sources' to see registered sources")
    )]
    SourceNotFound { id: String },

    #[error("Local folder '{path}' is not a usable skill source: {reason}")]
    #[diagnostic(code(skillsync::source::invalid_folder))]
    InvalidLocalSource { path: String, reason: String },

    // Skill errors
    #[error("Skill '{id}' not found")]
    #[diagnostic(
        code(skillsync::skill::not_found),
        help("Run 'skillsync list' to see discovered skills, or 'skillsync sync' to refresh sources")
    )]
    SkillNotFound { id: String },

    #[error("Skill '{query}' is ambiguous: matches {candidates}")]
    #[diagnostic(
        code(skillsync::skill::ambiguous),
        help("Use the full skill id (source-id:path)")
    )]
    SkillAmbiguous { query: String, candidates: String },

    #[error("Skill '{id}' is frozen and cannot be enabled")]
    #[diagnostic(
        code(skillsync::skill::frozen),
        help("Run 'skillsync unfreeze {id}' first")
    )]
    SkillFrozen { id: String },

    // Materialization errors
    #[error("Destination name conflict: {}", describe_conflicts(.conflicts))]
    #[diagnostic(
        code(skillsync::materialize::name_conflict),
        help("Disable or rename one of the conflicting skills; nothing was written")
    )]
    NameConflict { conflicts: Vec<NameConflict> },

    #[error("Folder '{name}' is protected and cannot be {action}")]
    #[diagnostic(
        code(skillsync::materialize::protected),
        help("This folder is marked manual. Run 'skillsync release {name}' or pass --force")
    )]
    ProtectedFolder { name: String, action: String },

    #[error("Skill source '{path}' lies inside the skills destination")]
    #[diagnostic(
        code(skillsync::materialize::source_in_destination),
        help("Move the skill outside the destination, or run 'skillsync protect <folder>' to keep it in place")
    )]
    SourceInDestination { path: String },

    #[error("Folder '{name}' is not present in the skills destination")]
    #[diagnostic(code(skillsync::materialize::folder_not_found))]
    FolderNotFound { name: String },

    #[error("Manifest at '{path}' is invalid: {reason}")]
    #[diagnostic(
        code(skillsync::materialize::manifest_invalid),
        help("Fix or delete the manifest file, then run 'skillsync reconcile'")
    )]
    ManifestInvalid { path: String, reason: String },

    // State and configuration errors
    #[error("State file '{path}' is invalid: {reason}")]
    #[diagnostic(code(skillsync::state::invalid))]
    StateInvalid { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(skillsync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Could not determine storage directory")]
    #[diagnostic(
        code(skillsync::config::storage_unavailable),
        help("Set SKILLSYNC_HOME to a writable directory")
    )]
    StorageUnavailable,

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(skillsync::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(skillsync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(skillsync::fs::io_error))]
    IoError { message: String },

    #[error("Prompt failed: {message}")]
    #[diagnostic(code(skillsync::prompt::failed))]
    PromptFailed { message: String },
}

impl From<std::io::Error> for SkillsyncError {
    fn from(err: std::io::Error) -> Self {
        SkillsyncError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SkillsyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SkillsyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SkillsyncError {
    fn from(err: serde_json::Error) -> Self {
        SkillsyncError::StateInvalid {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for SkillsyncError {
    fn from(err: git2::Error) -> Self {
        SkillsyncError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

impl From<inquire::InquireError> for SkillsyncError {
    fn from(err: inquire::InquireError) -> Self {
        SkillsyncError::PromptFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SkillsyncError>;
