//! File system errors

use std::path::Path;

use super::SkillsyncError;

/// Creates a read failure for `path`
pub fn read_failed(path: &Path, reason: impl ToString) -> SkillsyncError {
    SkillsyncError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates a write failure for `path`
pub fn write_failed(path: &Path, reason: impl ToString) -> SkillsyncError {
    SkillsyncError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> SkillsyncError {
    SkillsyncError::IoError {
        message: message.into(),
    }
}
