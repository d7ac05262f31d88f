//! Materialization errors

use std::path::Path;

use super::{NameConflict, SkillsyncError};

/// Creates a name conflict error from the offending groups
pub fn name_conflict(conflicts: Vec<NameConflict>) -> SkillsyncError {
    SkillsyncError::NameConflict { conflicts }
}

/// Creates a protected folder error
pub fn protected(name: impl Into<String>, action: impl Into<String>) -> SkillsyncError {
    SkillsyncError::ProtectedFolder {
        name: name.into(),
        action: action.into(),
    }
}

/// Creates an error for a skill source that overlaps the destination tree
pub fn source_in_destination(path: &Path) -> SkillsyncError {
    SkillsyncError::SourceInDestination {
        path: path.display().to_string(),
    }
}
