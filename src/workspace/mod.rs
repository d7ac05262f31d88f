//! Workspace context
//!
//! A [`Workspace`] ties one workspace root to the shared storage root:
//!
//! ```text
//! <storageRoot>/
//! ├── config.yaml          # destination, providers, accounts
//! ├── sources.json         # registered sources
//! ├── profile.json         # global defaults and frozen skills
//! ├── accounts.json        # account re-selections per host
//! └── source-cache/<id>/   # one checkout per remote source
//!
//! <workspace>/
//! ├── .skillsync/workspace.json   # enabled skills
//! └── .claude/skills/             # materialized skills + .manifest.json
//! ```
//!
//! State is loaded once in [`Workspace::open`] and written through by each
//! component on mutation.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::activation::{Activation, ApplyReport};
use crate::config::paths::workspace_state_file;
use crate::config::{Config, StoragePaths};
use crate::discovery::{SkillBundle, discover_all};
use crate::error::{Result, SkillsyncError};
use crate::git::Git2Transport;
use crate::materialize::{Materializer, sanitize};
use crate::selection::{IdSet, SelectionOverlay};
use crate::source::{Source, SourceRegistry};
use crate::sync::{ConfiguredAccounts, SyncOutcome, SyncReport, Synchronizer};

/// What [`Workspace::remove_source`] cleaned up
#[derive(Debug)]
pub struct RemovedSource {
    pub source: Source,
    pub checkout_removed: bool,
    pub ids_removed: usize,
    pub apply: ApplyReport,
}

/// Registry, overlay, synchronizer and materializer for one workspace
pub struct Workspace {
    pub root: PathBuf,
    pub paths: StoragePaths,
    pub config: Config,
    pub registry: SourceRegistry,
    pub overlay: SelectionOverlay,
    pub materializer: Materializer,
    synchronizer: Synchronizer,
}

impl Workspace {
    /// Open `root` against `paths` with the libgit2 transport
    pub fn open(root: &Path, paths: StoragePaths, interactive: bool) -> Result<Self> {
        let config = Config::load(&paths.config_file())?;
        let accounts = ConfiguredAccounts::new(config.clone(), Some(paths.accounts_file()), interactive)?;
        let synchronizer = Synchronizer::new(paths.source_cache_dir(), Box::new(Git2Transport), Box::new(accounts));
        Self::with_synchronizer(root, paths, config, synchronizer)
    }

    /// Open with an explicit synchronizer
    pub fn with_synchronizer(
        root: &Path,
        paths: StoragePaths,
        config: Config,
        synchronizer: Synchronizer,
    ) -> Result<Self> {
        let registry = SourceRegistry::open(paths.registry_file())?;
        let overlay = SelectionOverlay::open(workspace_state_file(root), paths.profile_file())?;
        let materializer = Materializer::new(config.destination_for(root));
        debug!(
            root = %root.display(),
            storage = %paths.root().display(),
            destination = %materializer.destination().display(),
            "Opened workspace"
        );

        Ok(Self {
            root: root.to_path_buf(),
            paths,
            config,
            registry,
            overlay,
            materializer,
            synchronizer,
        })
    }

    /// Parse `input` and register it; returns the entry and whether it is new
    ///
    /// Local folders inside the skills destination are refused.
    pub fn add_source(&mut self, input: &str) -> Result<(Source, bool)> {
        let source = Source::from_input(input, &self.root)?;
        let inside = source.local_path().filter(|path| self.materializer.contains(path));
        if let Some(path) = inside {
            return Err(crate::error::materialize::source_in_destination(&path));
        }
        let (source, added) = self.registry.add(source)?;
        if added {
            info!(id = %source.id, uri = %source.uri, "Registered source");
        }
        Ok((source, added))
    }

    /// Sync one source and record the result
    pub fn sync_source(&mut self, id: &str) -> Result<SyncOutcome> {
        let source = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| SkillsyncError::SourceNotFound { id: id.to_string() })?;
        let outcome = self.synchronizer.sync(&source)?;
        self.registry.mark_synced(&source.id, Utc::now(), outcome.auth_mode)?;
        Ok(outcome)
    }

    /// Sync every registered source
    pub fn sync_all<F>(&mut self, on_start: F) -> Vec<SyncReport>
    where
        F: FnMut(&Source, usize, usize),
    {
        self.synchronizer.sync_all(&mut self.registry, on_start)
    }

    /// Unregister a source, deleting its checkout, its overlay ids and its
    /// materialized folders
    pub fn remove_source(&mut self, query: &str) -> Result<RemovedSource> {
        let id = self.registry.find(query)?.id.clone();
        let source = self.registry.remove(&id)?;
        let checkout_removed = self.synchronizer.remove_checkout(&id)?;
        let ids_removed = self.overlay.remove_source(&id)?;

        let bundles = self.discover();
        let apply = self.activation(&bundles).apply()?;
        info!(id = %id, ids_removed, "Removed source");

        Ok(RemovedSource {
            source,
            checkout_removed,
            ids_removed,
            apply,
        })
    }

    /// Directory holding the content of `source`
    pub fn content_root(&self, source: &Source) -> PathBuf {
        self.synchronizer.content_root(source)
    }

    /// Bundles offered by every registered source, in registration order
    pub fn discover(&self) -> Vec<SkillBundle> {
        discover_all(self.registry.list(), |source| self.synchronizer.content_root(source))
    }

    /// Activation over a discovery snapshot
    pub fn activation<'a>(&'a mut self, bundles: &'a [SkillBundle]) -> Activation<'a> {
        Activation::new(&mut self.overlay, &self.materializer, bundles)
    }

    /// Every id the overlay currently mentions
    pub fn known_ids(&self) -> IdSet {
        self.overlay
            .enabled()
            .iter()
            .chain(self.overlay.defaults())
            .chain(self.overlay.frozen())
            .cloned()
            .collect()
    }

    /// Uninstall the destination folder `name`, disabling the skills that
    /// materialize into it so the next apply does not bring it back
    pub fn uninstall(&mut self, name: &str, force: bool) -> Result<Vec<String>> {
        self.materializer.uninstall(name, force)?;

        let bundles = self.discover();
        let disabled: Vec<String> = bundles
            .iter()
            .filter(|bundle| self.overlay.enabled().contains(&bundle.id) && sanitize(&bundle.slug) == name)
            .map(|bundle| bundle.id.clone())
            .collect();
        if !disabled.is_empty() {
            let enabled: IdSet = self
                .overlay
                .enabled()
                .iter()
                .filter(|id| !disabled.contains(id))
                .cloned()
                .collect();
            self.overlay.replace_enabled(enabled)?;
        }
        Ok(disabled)
    }
}

/// Resolve a skill argument to a bundle id
///
/// Accepts a full id (discovered, or already present in `known`), a slug, or
/// a destination folder name. Slugs matching several bundles are ambiguous.
pub fn resolve_skill(query: &str, bundles: &[SkillBundle], known: &IdSet) -> Result<String> {
    if bundles.iter().any(|bundle| bundle.id == query) || known.contains(query) {
        return Ok(query.to_string());
    }

    let matches: BTreeSet<&str> = bundles
        .iter()
        .filter(|bundle| bundle.slug == query || sanitize(&bundle.slug) == query)
        .map(|bundle| bundle.id.as_str())
        .collect();

    if matches.len() > 1 {
        return Err(SkillsyncError::SkillAmbiguous {
            query: query.to_string(),
            candidates: matches.into_iter().collect::<Vec<_>>().join(", "),
        });
    }
    matches
        .into_iter()
        .next()
        .map(str::to_string)
        .ok_or_else(|| SkillsyncError::SkillNotFound { id: query.to_string() })
}

/// Resolve several skill arguments
pub fn resolve_skills(queries: &[String], bundles: &[SkillBundle], known: &IdSet) -> Result<Vec<String>> {
    queries.iter().map(|query| resolve_skill(query, bundles, known)).collect()
}
