//! Destination manifest (`<destination>/.manifest.json`)
//!
//! Records which destination folders skillsync owns (`managedFolders`) and
//! which the user protected (`manualFolders`). The sets are disjoint and keyed
//! by folder name.
//!
//! Older files without `manualFolders` are read with an empty manual set and
//! rewritten once in the current shape.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SkillsyncError};
use crate::state::write_json;

/// File name of the manifest inside the destination
pub const MANIFEST_FILE: &str = ".manifest.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredManifest {
    #[serde(default)]
    managed_folders: Vec<String>,
    manual_folders: Option<Vec<String>>,
}

/// Managed and manual folder names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub managed_folders: BTreeSet<String>,
    pub manual_folders: BTreeSet<String>,
}

impl Manifest {
    pub fn path(destination: &Path) -> PathBuf {
        destination.join(MANIFEST_FILE)
    }

    /// Load the manifest of `destination`, empty when there is none
    pub fn load(destination: &Path) -> Result<Self> {
        let path = Self::path(destination);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| crate::error::fs::read_failed(&path, e))?;
        let stored: StoredManifest = serde_json::from_str(&content).map_err(|e| SkillsyncError::ManifestInvalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let migrated = stored.manual_folders.is_none();
        let manual_folders: BTreeSet<String> = stored.manual_folders.unwrap_or_default().into_iter().collect();
        let mut managed_folders: BTreeSet<String> = stored.managed_folders.into_iter().collect();

        let before = managed_folders.len();
        managed_folders.retain(|name| !manual_folders.contains(name));
        let repaired = managed_folders.len() != before;

        let manifest = Self {
            managed_folders,
            manual_folders,
        };
        if migrated || repaired {
            info!(path = %path.display(), migrated, repaired, "Rewriting manifest");
            manifest.save(destination)?;
        }
        Ok(manifest)
    }

    /// Write the manifest, creating the destination when needed
    pub fn save(&self, destination: &Path) -> Result<()> {
        write_json(&Self::path(destination), self)
    }

    pub fn exists(destination: &Path) -> bool {
        Self::path(destination).is_file()
    }

    pub fn is_manual(&self, name: &str) -> bool {
        self.manual_folders.contains(name)
    }

    pub fn is_managed(&self, name: &str) -> bool {
        self.managed_folders.contains(name)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.is_manual(name) || self.is_managed(name)
    }

    /// Move `name` into the manual set
    pub fn mark_manual(&mut self, name: &str) {
        self.managed_folders.remove(name);
        self.manual_folders.insert(name.to_string());
    }

    /// Move `name` into the managed set
    pub fn mark_managed(&mut self, name: &str) {
        self.manual_folders.remove(name);
        self.managed_folders.insert(name.to_string());
    }

    /// Forget `name` entirely
    pub fn forget(&mut self, name: &str) -> bool {
        let managed = self.managed_folders.remove(name);
        let manual = self.manual_folders.remove(name);
        managed || manual
    }
}
