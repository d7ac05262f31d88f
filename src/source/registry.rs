//! Persisted list of registered sources
//!
//! Stored at `<storageRoot>/sources.json` as `{"sources": [...]}`, loaded when
//! the registry is opened and written through on every mutation.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthMode, Source};
use crate::error::{Result, SkillsyncError};
use crate::state::StateFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryData {
    #[serde(default)]
    sources: Vec<Source>,
}

/// Registered sources, in registration order
#[derive(Debug)]
pub struct SourceRegistry {
    state: StateFile<RegistryData>,
}

impl SourceRegistry {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            state: StateFile::load(path)?,
        })
    }

    pub fn list(&self) -> &[Source] {
        &self.state.get().sources
    }

    pub fn get(&self, id: &str) -> Option<&Source> {
        self.list().iter().find(|source| source.id == id)
    }

    /// Find a source by id, unique id prefix, or the uri it was added with
    pub fn find(&self, query: &str) -> Result<&Source> {
        if let Some(source) = self.get(query) {
            return Ok(source);
        }
        let matches: Vec<&Source> = self
            .list()
            .iter()
            .filter(|source| source.id.starts_with(query) || source.uri == query)
            .collect();
        match matches.as_slice() {
            [source] => Ok(*source),
            _ => Err(SkillsyncError::SourceNotFound {
                id: query.to_string(),
            }),
        }
    }

    /// Register `source`; returns the stored entry and whether it was new
    pub fn add(&mut self, source: Source) -> Result<(Source, bool)> {
        if let Some(existing) = self.get(&source.id) {
            return Ok((existing.clone(), false));
        }
        let stored = source.clone();
        self.state.update(|data| data.sources.push(source))?;
        Ok((stored, true))
    }

    /// Record a successful sync
    pub fn mark_synced(&mut self, id: &str, at: DateTime<Utc>, auth_mode: Option<AuthMode>) -> Result<()> {
        if self.get(id).is_none() {
            return Err(SkillsyncError::SourceNotFound { id: id.to_string() });
        }
        self.state.update(|data| {
            if let Some(source) = data.sources.iter_mut().find(|s| s.id == id) {
                source.last_sync_at = Some(at);
                if auth_mode.is_some() {
                    source.auth_mode = auth_mode;
                }
            }
        })
    }

    /// Drop the registry entry for `id`
    pub fn remove(&mut self, id: &str) -> Result<Source> {
        let removed = self
            .get(id)
            .cloned()
            .ok_or_else(|| SkillsyncError::SourceNotFound { id: id.to_string() })?;
        self.state.update(|data| data.sources.retain(|s| s.id != id))?;
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::source::reference::resolve;
    use tempfile::TempDir;

    fn git_source(uri: &str) -> Source {
        Source::git(uri, resolve(uri).expect("resolve"))
    }

    #[test]
    fn test_add_is_idempotent() {
        let temp = TempDir::new().expect("temp dir");
        let mut registry = SourceRegistry::open(temp.path().join("sources.json")).expect("open");

        let (first, added) = registry.add(git_source("https://github.com/acme/tools")).expect("add");
        assert!(added);
        let (second, added) = registry.add(git_source("https://github.com/acme/tools/")).expect("add");
        assert!(!added);
        assert_eq!(first.id, second.id);
        assert_eq!(second.uri, "https://github.com/acme/tools");
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("sources.json");
        let id = {
            let mut registry = SourceRegistry::open(&path).expect("open");
            let (source, _) = registry.add(git_source("https://github.com/acme/tools")).expect("add");
            registry
                .mark_synced(&source.id, Utc::now(), Some(AuthMode::Token))
                .expect("mark");
            source.id
        };

        let registry = SourceRegistry::open(&path).expect("reopen");
        let source = registry.get(&id).expect("source");
        assert!(source.last_sync_at.is_some());
        assert_eq!(source.auth_mode, Some(AuthMode::Token));

        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("\"type\": \"gitRepo\""));
        assert!(content.ends_with("}\n"));
    }

    #[test]
    fn test_find_by_prefix_and_uri() {
        let temp = TempDir::new().expect("temp dir");
        let mut registry = SourceRegistry::open(temp.path().join("sources.json")).expect("open");
        let (source, _) = registry.add(git_source("https://github.com/acme/tools")).expect("add");

        assert_eq!(registry.find(&source.id[..6]).expect("prefix").id, source.id);
        assert_eq!(registry.find("https://github.com/acme/tools").expect("uri").id, source.id);
        assert!(registry.find("zzzz").is_err());
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().expect("temp dir");
        let mut registry = SourceRegistry::open(temp.path().join("sources.json")).expect("open");
        let (source, _) = registry.add(git_source("https://github.com/acme/tools")).expect("add");

        registry.remove(&source.id).expect("remove");
        assert!(registry.list().is_empty());
        assert!(matches!(
            registry.remove(&source.id),
            Err(SkillsyncError::SourceNotFound { .. })
        ));
        assert!(registry.mark_synced(&source.id, Utc::now(), None).is_err());
    }
}
