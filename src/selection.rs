//! Selection overlay: which skill ids are enabled, default or frozen
//!
//! - `workspaceEnabled` lives in `<workspace>/.skillsync/workspace.json`
//! - `globalDefaults` and `frozenSkills` live in `<storageRoot>/profile.json`
//!
//! Every set is persisted sorted and deduplicated. Ordering rules between
//! the sets are applied by [`crate::activation`]. The one rule enforced here
//! is that a frozen id is never left enabled at rest: the frozen set is shared
//! by every workspace, so ids frozen elsewhere are dropped on open.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::state::StateFile;

/// A set of skill bundle ids
pub type IdSet = BTreeSet<String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkspaceSelection {
    #[serde(default)]
    workspace_enabled: IdSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSelection {
    #[serde(default)]
    global_defaults: IdSet,
    #[serde(default)]
    frozen_skills: IdSet,
}

/// The three persisted id sets
#[derive(Debug)]
pub struct SelectionOverlay {
    workspace: StateFile<WorkspaceSelection>,
    profile: StateFile<ProfileSelection>,
}

impl SelectionOverlay {
    pub fn open(workspace_file: impl Into<PathBuf>, profile_file: impl Into<PathBuf>) -> Result<Self> {
        let mut overlay = Self {
            workspace: StateFile::load(workspace_file)?,
            profile: StateFile::load(profile_file)?,
        };
        overlay.release_frozen()?;
        Ok(overlay)
    }

    /// Remove frozen ids from the enabled set, persisting when anything changed
    ///
    /// Returns how many ids were dropped.
    pub fn release_frozen(&mut self) -> Result<usize> {
        let enabled: IdSet = self.enabled().difference(self.frozen()).cloned().collect();
        let dropped = self.enabled().len() - enabled.len();
        if dropped > 0 {
            info!(count = dropped, "Disabled skills frozen in the profile");
            self.replace_enabled(enabled)?;
        }
        Ok(dropped)
    }

    pub fn enabled(&self) -> &IdSet {
        &self.workspace.get().workspace_enabled
    }

    pub fn replace_enabled(&mut self, ids: IdSet) -> Result<()> {
        self.workspace.replace(WorkspaceSelection { workspace_enabled: ids })
    }

    pub fn defaults(&self) -> &IdSet {
        &self.profile.get().global_defaults
    }

    pub fn replace_defaults(&mut self, ids: IdSet) -> Result<()> {
        self.profile.update(|profile| profile.global_defaults = ids)
    }

    pub fn frozen(&self) -> &IdSet {
        &self.profile.get().frozen_skills
    }

    pub fn replace_frozen(&mut self, ids: IdSet) -> Result<()> {
        self.profile.update(|profile| profile.frozen_skills = ids)
    }

    pub fn is_frozen(&self, id: &str) -> bool {
        self.frozen().contains(id)
    }

    /// Drop every id that belongs to `source_id` from all three sets
    ///
    /// Returns how many ids were removed in total.
    pub fn remove_source(&mut self, source_id: &str) -> Result<usize> {
        let prefix = format!("{source_id}:");
        let keep = |set: &IdSet| -> IdSet { set.iter().filter(|id| !id.starts_with(&prefix)).cloned().collect() };

        let enabled = keep(self.enabled());
        let defaults = keep(self.defaults());
        let frozen = keep(self.frozen());
        let removed = (self.enabled().len() - enabled.len())
            + (self.defaults().len() - defaults.len())
            + (self.frozen().len() - frozen.len());

        if removed > 0 {
            self.replace_enabled(enabled)?;
            self.profile.replace(ProfileSelection {
                global_defaults: defaults,
                frozen_skills: frozen,
            })?;
        }
        Ok(removed)
    }
}
