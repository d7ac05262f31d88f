//! Storage path utilities and constants
//!
//! ```text
//! <storageRoot>/
//! ├── config.yaml
//! ├── sources.json
//! ├── profile.json
//! └── source-cache/
//!     └── <sourceId>/      # full working-tree clone
//! ```

use std::path::{Path, PathBuf};

use crate::error::{Result, SkillsyncError};

/// Environment variable overriding the storage root
pub const HOME_ENV: &str = "SKILLSYNC_HOME";

/// Default directory name under the user's data directory
const STORAGE_DIR: &str = "skillsync";

/// Checkout cache subdirectory
pub const SOURCE_CACHE_DIR: &str = "source-cache";

/// Settings file name
pub const CONFIG_FILE: &str = "config.yaml";

/// Source registry file name
pub const REGISTRY_FILE: &str = "sources.json";

/// Profile-scoped selection file name
pub const PROFILE_FILE: &str = "profile.json";

/// Cached account choices per host
pub const ACCOUNTS_FILE: &str = "accounts.json";

/// Per-workspace state directory
pub const WORKSPACE_STATE_DIR: &str = ".skillsync";

/// Per-workspace selection file name
pub const WORKSPACE_FILE: &str = "workspace.json";

/// Resolved storage layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    /// Use an explicit storage root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the storage root from `SKILLSYNC_HOME` or the platform data directory
    pub fn from_env() -> Result<Self> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            if !root.is_empty() {
                return Ok(Self::new(root));
            }
        }

        let base = dirs::data_dir().ok_or(SkillsyncError::StorageUnavailable)?;
        Ok(Self::new(base.join(STORAGE_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    pub fn profile_file(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }

    pub fn source_cache_dir(&self) -> PathBuf {
        self.root.join(SOURCE_CACHE_DIR)
    }

    /// Checkout directory for a source. Derived only from the source id.
    pub fn checkout_dir(&self, source_id: &str) -> PathBuf {
        self.source_cache_dir().join(source_id)
    }
}

/// Selection file for a workspace root
pub fn workspace_state_file(workspace_root: &Path) -> PathBuf {
    workspace_root.join(WORKSPACE_STATE_DIR).join(WORKSPACE_FILE)
}
