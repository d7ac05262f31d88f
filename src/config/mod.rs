//! Configuration file handling for skillsync
//!
//! This module contains:
//! - [`paths`]: storage root resolution and on-disk layout
//! - `config.yaml` - user settings (destination, providers, accounts)

pub mod paths;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillsyncError};

pub use paths::StoragePaths;

/// Default materialization destination, relative to the workspace root
pub const DEFAULT_DESTINATION: &str = ".claude/skills";

/// Host recognised as an account provider when none are configured
pub const DEFAULT_PROVIDER: &str = "github.com";

/// Settings loaded from `<storageRoot>/config.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where skills are materialized, relative to the workspace unless absolute
    pub destination: String,

    /// Hosts that support account re-selection
    pub providers: Vec<String>,

    /// Known account sessions
    pub accounts: Vec<AccountConfig>,

    /// Preferred account per host, used until a re-selection is cached
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub preferred_accounts: BTreeMap<String, String>,
}

/// One account session usable for token authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Display name (also the key used by `preferred_accounts`)
    pub name: String,

    /// Host the account belongs to
    #[serde(default = "default_host")]
    pub host: String,

    /// Literal access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable holding the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

fn default_host() -> String {
    DEFAULT_PROVIDER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            providers: vec![DEFAULT_PROVIDER.to_string()],
            accounts: Vec::new(),
            preferred_accounts: BTreeMap::new(),
        }
    }
}

impl AccountConfig {
    /// Resolve the access token, reading `token_env` when no literal token is set
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Some(token.clone());
        }
        self.token_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|t| !t.is_empty())
    }
}

impl Config {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::error::fs::read_failed(path, e))?;
        Self::from_yaml(&yaml).map_err(|e| match e {
            SkillsyncError::ConfigParseFailed { reason, .. } => SkillsyncError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Destination directory for a workspace
    pub fn destination_for(&self, workspace_root: &Path) -> PathBuf {
        let destination = Path::new(&self.destination);
        if destination.is_absolute() {
            destination.to_path_buf()
        } else {
            workspace_root.join(destination)
        }
    }

    /// Whether `host` supports forced account re-selection
    pub fn is_provider(&self, host: &str) -> bool {
        self.providers
            .iter()
            .any(|provider| provider.eq_ignore_ascii_case(host))
    }
}
