//! Materialization of enabled skills into the destination tree
//!
//! [`Materializer::materialize`] converges `<destination>/<name>/` folders to a
//! desired bundle set:
//! 1. Assign destination names and fail on any shared name, before any write
//! 2. Skip names protected as manual folders
//! 3. Remove managed folders that are no longer desired
//! 4. Re-copy every desired folder
//! 5. Persist the manifest
//!
//! Copies and removals are not transactional. Re-running `materialize` and
//! [`Materializer::reconcile_untracked`] recover from an interrupted run.

pub mod manifest;
pub mod names;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::fs::{canonical_or_raw, copy_dir_recursive, paths_overlap, remove_path};
use crate::discovery::{SENTINEL_FILE, SkillBundle};
use crate::error::materialize::{protected, source_in_destination};
use crate::error::{Result, SkillsyncError};

pub use manifest::{MANIFEST_FILE, Manifest};
pub use names::sanitize;

/// Counts reported by [`Materializer::materialize`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializeResult {
    pub copied: usize,
    pub removed: usize,
    pub skipped_manual: usize,
}

/// Outcome of [`Materializer::reconcile_untracked`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileResult {
    /// Untracked skill folders adopted as manual
    pub adopted: Vec<String>,
    /// Manifest entries whose folder no longer exists
    pub pruned: Vec<String>,
}

/// Destination folders grouped by ownership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderListing {
    pub managed: Vec<String>,
    pub manual: Vec<String>,
    pub untracked: Vec<String>,
}

/// Reconciles a destination directory against desired bundles
#[derive(Debug, Clone)]
pub struct Materializer {
    destination: PathBuf,
}

impl Materializer {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn manifest(&self) -> Result<Manifest> {
        Manifest::load(&self.destination)
    }

    /// Path of a destination folder; `None` for names that would escape the root
    fn folder(&self, name: &str) -> Option<PathBuf> {
        names::is_folder_name(name).then(|| self.destination.join(name))
    }

    /// Remove the folder `name`; returns whether anything was deleted
    fn remove_folder(&self, name: &str) -> Result<bool> {
        let Some(path) = self.folder(name) else {
            warn!(name, "Ignoring manifest entry that is not a plain folder name");
            return Ok(false);
        };
        if std::fs::symlink_metadata(&path).is_err() {
            debug!(name, "Stale skill folder is already gone");
            return Ok(false);
        }
        remove_path(&path).map_err(|e| crate::error::fs::write_failed(&path, e))?;
        Ok(true)
    }

    /// Whether `path` lies inside the destination tree
    pub fn contains(&self, path: &Path) -> bool {
        canonical_or_raw(path).starts_with(canonical_or_raw(&self.destination))
    }

    /// Refuse bundles that would be deleted or copied into themselves by the overwrite
    fn check_outside(&self, name: &str, bundle: &SkillBundle) -> Result<()> {
        let target = canonical_or_raw(&self.destination).join(name);
        let source = canonical_or_raw(&bundle.absolute_path);
        if paths_overlap(&source, &target) {
            return Err(source_in_destination(&bundle.absolute_path));
        }
        Ok(())
    }

    fn copy_bundle(&self, name: &str, bundle: &SkillBundle) -> Result<()> {
        let Some(target) = self.folder(name) else {
            return Err(crate::error::fs::io_error(format!("invalid destination name '{name}'")));
        };
        if target.exists() {
            remove_path(&target).map_err(|e| crate::error::fs::write_failed(&target, e))?;
        }
        copy_dir_recursive(&bundle.absolute_path, &target).map_err(|e| crate::error::fs::write_failed(&target, e))
    }

    /// Converge the destination to exactly `desired` (minus manual folders)
    pub fn materialize(&self, desired: &[SkillBundle]) -> Result<MaterializeResult> {
        let assigned = names::assign(desired)?;
        let mut manifest = self.manifest()?;
        let mut result = MaterializeResult::default();

        let mut expected: Vec<(String, &SkillBundle)> = Vec::with_capacity(assigned.len());
        for (name, bundle) in assigned {
            if manifest.is_manual(&name) {
                debug!(name, id = %bundle.id, "Skipping manual folder");
                result.skipped_manual += 1;
            } else {
                expected.push((name, bundle));
            }
        }
        for (name, bundle) in &expected {
            self.check_outside(name, bundle)?;
        }
        let expected_names: BTreeSet<String> = expected.iter().map(|(name, _)| name.clone()).collect();

        let stale: Vec<String> = manifest
            .managed_folders
            .difference(&expected_names)
            .cloned()
            .collect();
        for name in &stale {
            if self.remove_folder(name)? {
                info!(name, "Removed stale skill folder");
                result.removed += 1;
            }
        }

        for (name, bundle) in &expected {
            if !manifest.is_managed(name) && self.destination.join(name).exists() {
                info!(name, "Replacing untracked folder");
            }
            debug!(name, id = %bundle.id, "Copying skill");
            self.copy_bundle(name, bundle)?;
            result.copied += 1;
        }

        let changed = manifest.managed_folders != expected_names;
        manifest.managed_folders = expected_names;
        if changed || !expected.is_empty() || Manifest::exists(&self.destination) {
            manifest.save(&self.destination)?;
        }

        info!(
            copied = result.copied,
            removed = result.removed,
            skipped_manual = result.skipped_manual,
            "Materialized skills"
        );
        Ok(result)
    }

    /// Protect `name` from automatic update and removal
    pub fn mark_as_manual(&self, name: &str) -> Result<()> {
        let mut manifest = self.manifest()?;
        let exists = self.folder(name).is_some_and(|path| path.is_dir());
        if !exists && !manifest.is_tracked(name) {
            return Err(SkillsyncError::FolderNotFound { name: name.to_string() });
        }
        manifest.mark_manual(name);
        manifest.save(&self.destination)?;
        info!(name, "Marked folder as manual");
        Ok(())
    }

    /// Hand `name` back to skillsync
    pub fn mark_as_managed(&self, name: &str) -> Result<()> {
        let mut manifest = self.manifest()?;
        let exists = self.folder(name).is_some_and(|path| path.is_dir());
        if !exists && !manifest.is_tracked(name) {
            return Err(SkillsyncError::FolderNotFound { name: name.to_string() });
        }
        manifest.mark_managed(name);
        manifest.save(&self.destination)?;
        info!(name, "Marked folder as managed");
        Ok(())
    }

    /// Delete the folder `name` and its manifest entry
    ///
    /// Manual folders are refused unless `force` is set.
    pub fn uninstall(&self, name: &str, force: bool) -> Result<()> {
        let mut manifest = self.manifest()?;
        if manifest.is_manual(name) && !force {
            return Err(protected(name, "uninstalled"));
        }

        let path = self
            .folder(name)
            .ok_or_else(|| SkillsyncError::FolderNotFound { name: name.to_string() })?;
        let exists = path.exists();
        if !exists && !manifest.is_tracked(name) {
            return Err(SkillsyncError::FolderNotFound { name: name.to_string() });
        }

        if exists {
            remove_path(&path).map_err(|e| crate::error::fs::write_failed(&path, e))?;
        }
        if manifest.forget(name) {
            manifest.save(&self.destination)?;
        }
        info!(name, "Uninstalled skill folder");
        Ok(())
    }

    /// Re-copy the managed folder `name` from the matching bundle in `bundles`
    pub fn update_one(&self, name: &str, bundles: &[SkillBundle]) -> Result<()> {
        let manifest = self.manifest()?;
        if manifest.is_manual(name) {
            return Err(protected(name, "updated"));
        }
        if !manifest.is_managed(name) {
            return Err(SkillsyncError::FolderNotFound { name: name.to_string() });
        }

        let matching: Vec<SkillBundle> = bundles
            .iter()
            .filter(|bundle| sanitize(&bundle.slug) == name)
            .cloned()
            .collect();
        let assigned = names::assign(&matching)?;
        let Some((_, bundle)) = assigned.first() else {
            return Err(SkillsyncError::SkillNotFound { id: name.to_string() });
        };

        self.check_outside(name, bundle)?;
        self.copy_bundle(name, bundle)?;
        info!(name, id = %bundle.id, "Updated skill folder");
        Ok(())
    }

    /// Top-level directories of the destination, sorted
    fn folders_on_disk(&self) -> Result<Vec<String>> {
        if !self.destination.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.destination)
            .map_err(|e| crate::error::fs::read_failed(&self.destination, e))?;
        let mut folders: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        folders.sort();
        Ok(folders)
    }

    /// Adopt untracked skill folders as manual and prune entries with no folder
    pub fn reconcile_untracked(&self) -> Result<ReconcileResult> {
        let mut manifest = self.manifest()?;
        let mut result = ReconcileResult::default();

        for name in self.folders_on_disk()? {
            if !manifest.is_tracked(&name) && self.destination.join(&name).join(SENTINEL_FILE).is_file() {
                info!(name, "Adopting untracked skill folder as manual");
                manifest.mark_manual(&name);
                result.adopted.push(name);
            }
        }

        let tracked: Vec<String> = manifest
            .managed_folders
            .iter()
            .chain(manifest.manual_folders.iter())
            .cloned()
            .collect();
        for name in tracked {
            if !self.folder(&name).is_some_and(|path| path.is_dir()) {
                info!(name, "Pruning manifest entry without folder");
                manifest.forget(&name);
                result.pruned.push(name);
            }
        }
        result.pruned.sort();

        if !result.adopted.is_empty() || !result.pruned.is_empty() {
            manifest.save(&self.destination)?;
        }
        Ok(result)
    }

    /// Destination folders grouped by ownership
    pub fn list_folders(&self) -> Result<FolderListing> {
        let manifest = self.manifest()?;
        let untracked = self
            .folders_on_disk()?
            .into_iter()
            .filter(|name| !manifest.is_tracked(name))
            .collect();
        Ok(FolderListing {
            managed: manifest.managed_folders.into_iter().collect(),
            manual: manifest.manual_folders.into_iter().collect(),
            untracked,
        })
    }
}
