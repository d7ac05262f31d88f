//! Skill source handling
//!
//! This module handles parsing user input into registered sources:
//! - Git repositories: `https://github.com/owner/repo`, `git@github.com:owner/repo.git`
//! - Folder URLs: `https://github.com/owner/repo/tree/main/skills`
//! - skills.sh links: `https://skills.sh/owner/repo/skill-slug`
//! - Local folders holding skills, or a single local skill folder
//!
//! ## Module Organization
//!
//! - `reference.rs`: repository reference resolution
//! - `registry.rs`: persisted list of registered sources

pub mod reference;
pub mod registry;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discovery::SENTINEL_FILE;
use crate::error::{Result, SkillsyncError};
use crate::hash::stable_id;

pub use reference::{ResolvedReference, SkillsShReference};
pub use registry::SourceRegistry;

/// Kind of registered source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    GitRepo,
    LocalFolder,
    SkillFolder,
    SkillsShUrl,
}

impl SourceKind {
    /// Whether sources of this kind live in a git checkout
    pub fn is_remote(self) -> bool {
        matches!(self, Self::GitRepo | Self::SkillsShUrl)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GitRepo => "git",
            Self::LocalFolder => "folder",
            Self::SkillFolder => "skill",
            Self::SkillsShUrl => "skills.sh",
        };
        f.write_str(name)
    }
}

/// Credential tier that last synced a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Ambient,
    Token,
    Ssh,
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ambient => "ambient",
            Self::Token => "token",
            Self::Ssh => "ssh",
        };
        f.write_str(name)
    }
}

/// A registered skill source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: SourceKind,

    /// What the user typed (or the absolute path for local kinds)
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_repo_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_root_path: Option<String>,

    /// Only bundles with this slug are offered (skills.sh links)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<AuthMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl Source {
    fn new(id: String, kind: SourceKind, uri: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            uri: uri.into(),
            canonical_repo_uri: None,
            branch: None,
            skills_root_path: None,
            skill_slug: None,
            auth_mode: None,
            last_sync_at: None,
        }
    }

    /// A git repository source from a resolved reference
    pub fn git(uri: impl Into<String>, reference: ResolvedReference) -> Self {
        let id = stable_id(&[
            Some(&reference.canonical_repo_uri),
            reference.branch.as_deref(),
            reference.skills_root_path.as_deref(),
        ]);
        let mut source = Self::new(id, SourceKind::GitRepo, uri);
        source.canonical_repo_uri = Some(reference.canonical_repo_uri);
        source.branch = reference.branch;
        source.skills_root_path = reference.skills_root_path;
        source
    }

    /// A single skill published on skills.sh
    pub fn skills_sh(uri: impl Into<String>, reference: SkillsShReference) -> Self {
        let id = stable_id(&[
            Some(&reference.canonical_repo_uri),
            None,
            None,
            Some(&reference.skill_slug),
        ]);
        let mut source = Self::new(id, SourceKind::SkillsShUrl, uri);
        source.canonical_repo_uri = Some(reference.canonical_repo_uri);
        source.skill_slug = Some(reference.skill_slug);
        source
    }

    /// A local folder scanned for skills, or a single skill folder when it
    /// directly contains the sentinel file
    pub fn local(path: &Path) -> Result<Self> {
        let absolute = path.canonicalize().map_err(|e| SkillsyncError::InvalidLocalSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if !absolute.is_dir() {
            return Err(SkillsyncError::InvalidLocalSource {
                path: path.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let kind = if absolute.join(SENTINEL_FILE).is_file() {
            SourceKind::SkillFolder
        } else {
            SourceKind::LocalFolder
        };
        let uri = absolute.display().to_string();
        let kind_tag = match kind {
            SourceKind::SkillFolder => "skillFolder",
            _ => "localFolder",
        };
        let id = stable_id(&[Some(kind_tag), Some(&uri)]);
        Ok(Self::new(id, kind, uri))
    }

    /// Build a source from user input
    ///
    /// skills.sh links and existing local directories are recognised first;
    /// everything else goes through the repository reference resolver.
    pub fn from_input(input: &str, cwd: &Path) -> Result<Self> {
        let trimmed = input.trim();
        if reference::is_skills_sh_link(trimmed) {
            return Ok(Self::skills_sh(trimmed, reference::resolve_skills_sh(trimmed)?));
        }

        let local = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        let candidate = cwd.join(local);
        if !trimmed.is_empty() && !trimmed.contains("://") && candidate.is_dir() {
            return Self::local(&candidate);
        }
        if trimmed.starts_with("file://") {
            return Self::local(Path::new(local));
        }

        Ok(Self::git(trimmed, reference::resolve(trimmed)?))
    }

    /// Repository URL to clone or pull, for remote kinds
    pub fn repo_url(&self) -> &str {
        self.canonical_repo_uri.as_deref().unwrap_or(&self.uri)
    }

    /// Folder holding the source's content for local kinds
    pub fn local_path(&self) -> Option<PathBuf> {
        (!self.kind.is_remote()).then(|| PathBuf::from(&self.uri))
    }

    /// Short human label
    pub fn label(&self) -> String {
        let mut label = self.repo_url().to_string();
        if let Some(branch) = &self.branch {
            label.push_str(&format!("@{branch}"));
        }
        if let Some(path) = &self.skills_root_path {
            label.push_str(&format!(":{path}"));
        }
        if let Some(slug) = &self.skill_slug {
            label.push_str(&format!(" [{slug}]"));
        }
        label
    }
}
