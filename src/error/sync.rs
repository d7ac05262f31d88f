//! Sync errors

use super::{SkillsyncError, SyncAction};

/// Creates a sync failure for `action` against `source_uri`
pub fn failed(
    action: SyncAction,
    source_uri: impl Into<String>,
    cause: impl Into<String>,
    remedy: Option<String>,
) -> SkillsyncError {
    SkillsyncError::SyncFailed {
        action,
        source_uri: source_uri.into(),
        cause: cause.into(),
        remedy,
    }
}

/// Creates an invalid reference error
pub fn invalid_reference(input: impl Into<String>, reason: impl Into<String>) -> SkillsyncError {
    SkillsyncError::InvalidReference {
        input: input.into(),
        reason: reason.into(),
    }
}
