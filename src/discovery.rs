//! Skill bundle discovery
//!
//! A skill bundle is a directory that directly contains [`SENTINEL_FILE`].
//! Discovery walks candidate roots breadth-first, records every bundle it
//! meets without descending into it, and prunes version-control and
//! dependency-cache directories.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::source::{Source, SourceKind};

/// File whose presence marks a directory as a skill bundle
pub const SENTINEL_FILE: &str = "SKILL.md";

/// Roots scanned inside a checkout when the source names no sub-path
pub const CANDIDATE_ROOTS: &[&str] = &[".claude/skills", "skills"];

/// Directories never descended into
const PRUNED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    ".venv",
    "__pycache__",
];

/// One importable skill folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillBundle {
    /// `<sourceId>:<relativePath>`
    pub id: String,
    pub source_id: String,
    /// Directory name, the only input to the destination folder name
    pub slug: String,
    /// Path relative to the source's content root, `/`-separated
    pub relative_path: String,
    pub absolute_path: PathBuf,
}

impl SkillBundle {
    fn new(source_id: &str, content_root: &Path, dir: &Path) -> Option<Self> {
        let slug = dir.file_name()?.to_string_lossy().into_owned();
        let relative = dir.strip_prefix(content_root).ok()?;
        let mut relative_path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        if relative_path.is_empty() {
            relative_path = slug.clone();
        }
        Some(Self {
            id: format!("{source_id}:{relative_path}"),
            source_id: source_id.to_string(),
            slug,
            relative_path,
            absolute_path: dir.to_path_buf(),
        })
    }
}

/// Case-insensitive ordering with the exact string as tie-breaker
pub fn compare_slugs(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn is_pruned(name: &str) -> bool {
    PRUNED_DIRS.contains(&name)
}

/// Breadth-first scan of `root`, stopping at bundles
fn scan_root(root: &Path, content_root: &Path, source_id: &str, found: &mut Vec<SkillBundle>) {
    if !root.is_dir() {
        return;
    }

    let mut queue = VecDeque::from([root.to_path_buf()]);
    while let Some(dir) = queue.pop_front() {
        if dir.join(SENTINEL_FILE).is_file() {
            if let Some(bundle) = SkillBundle::new(source_id, content_root, &dir) {
                trace!(id = %bundle.id, "Found skill bundle");
                found.push(bundle);
            }
            continue;
        }

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %dir.display(), "Skipping unreadable directory: {err}");
                continue;
            }
        };

        let mut children: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|entry| !is_pruned(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .collect();
        children.sort();
        queue.extend(children);
    }
}

/// Discover bundles under `checkout_root`
///
/// With `sub_path` only `checkout_root/sub_path` is scanned; otherwise every
/// entry of [`CANDIDATE_ROOTS`]. A missing root yields no bundles, and so
/// does a sub-path that is not a plain relative path inside the checkout.
pub fn discover(checkout_root: &Path, source_id: &str, sub_path: Option<&str>) -> Vec<SkillBundle> {
    let roots: Vec<PathBuf> = match sub_path {
        Some(sub_path) if !is_contained(sub_path) => {
            warn!(source = source_id, sub_path, "Ignoring sub-path outside the checkout");
            return Vec::new();
        }
        Some(sub_path) => vec![checkout_root.join(sub_path)],
        None => CANDIDATE_ROOTS.iter().map(|root| checkout_root.join(root)).collect(),
    };

    let mut found = Vec::new();
    for root in &roots {
        scan_root(root, checkout_root, source_id, &mut found);
    }
    finish(found)
}

fn is_contained(sub_path: &str) -> bool {
    let path = Path::new(sub_path);
    path.components().next().is_some() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Deduplicate by id and sort by slug
fn finish(found: Vec<SkillBundle>) -> Vec<SkillBundle> {
    let mut seen = HashSet::new();
    let mut bundles: Vec<SkillBundle> = found
        .into_iter()
        .filter(|bundle| seen.insert(bundle.id.clone()))
        .collect();
    bundles.sort_by(|a, b| compare_slugs(&a.slug, &b.slug).then_with(|| a.id.cmp(&b.id)));
    bundles
}

/// Discover the bundles a registered source offers, given its content root
pub fn discover_source(source: &Source, content_root: &Path) -> Vec<SkillBundle> {
    let bundles = match source.kind {
        SourceKind::GitRepo => discover(content_root, &source.id, source.skills_root_path.as_deref()),
        SourceKind::SkillsShUrl => {
            // The skill may live anywhere in the repository
            let mut found = Vec::new();
            scan_root(content_root, content_root, &source.id, &mut found);
            finish(found)
                .into_iter()
                .filter(|bundle| source.skill_slug.as_deref() == Some(bundle.slug.as_str()))
                .collect()
        }
        SourceKind::LocalFolder => {
            let mut found = Vec::new();
            scan_root(content_root, content_root, &source.id, &mut found);
            finish(found)
        }
        SourceKind::SkillFolder => {
            let parent = content_root.parent().unwrap_or(content_root);
            if content_root.join(SENTINEL_FILE).is_file() {
                SkillBundle::new(&source.id, parent, content_root).into_iter().collect()
            } else {
                Vec::new()
            }
        }
    };
    debug!(source = %source.id, count = bundles.len(), "Discovered skills");
    bundles
}

/// Discover bundles across `sources`, in registration order
pub fn discover_all<F>(sources: &[Source], content_root: F) -> Vec<SkillBundle>
where
    F: Fn(&Source) -> PathBuf,
{
    sources
        .iter()
        .flat_map(|source| discover_source(source, &content_root(source)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn skill(root: &Path, rel: &str) {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join(SENTINEL_FILE), format!("# {rel}\n")).expect("write");
    }

    fn ids(bundles: &[SkillBundle]) -> Vec<String> {
        bundles.iter().map(|b| b.relative_path.clone()).collect()
    }

    #[test]
    fn test_discovers_in_both_candidate_roots() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/beta");
        skill(temp.path(), "skills/Alpha");
        skill(temp.path(), ".claude/skills/gamma");
        skill(temp.path(), "elsewhere/delta");

        let bundles = discover(temp.path(), "src1", None);
        assert_eq!(ids(&bundles), vec!["skills/Alpha", "skills/beta", ".claude/skills/gamma"]);
        assert_eq!(bundles[0].id, "src1:skills/Alpha");
        assert_eq!(bundles[0].slug, "Alpha");
    }

    #[test]
    fn test_bundles_are_not_nested() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/outer");
        skill(temp.path(), "skills/outer/inner");
        skill(temp.path(), "skills/group/deep/leaf");

        let bundles = discover(temp.path(), "s", None);
        assert_eq!(ids(&bundles), vec!["skills/group/deep/leaf", "skills/outer"]);
    }

    #[test]
    fn test_pruned_directories() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/node_modules/pkg");
        skill(temp.path(), "skills/.git/hooks");
        skill(temp.path(), "skills/real");

        assert_eq!(ids(&discover(temp.path(), "s", None)), vec!["skills/real"]);
    }

    #[test]
    fn test_sub_path_hint_limits_scan() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "packs/core/one");
        skill(temp.path(), "skills/two");

        let bundles = discover(temp.path(), "s", Some("packs/core"));
        assert_eq!(ids(&bundles), vec!["packs/core/one"]);
    }

    #[test]
    fn test_sub_path_cannot_leave_checkout() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "secret/private");
        let checkout = temp.path().join("checkout");
        skill(&checkout, "skills/public");

        assert!(discover(&checkout, "s", Some("../secret")).is_empty());
        assert!(discover(&checkout, "s", Some("skills/../../secret")).is_empty());
        assert!(discover(&checkout, "s", Some("./skills")).is_empty());
        assert!(discover(&checkout, "s", Some(temp.path().join("secret").to_str().expect("utf8"))).is_empty());
        assert_eq!(ids(&discover(&checkout, "s", Some("skills"))), vec!["skills/public"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().expect("temp dir");
        assert!(discover(&temp.path().join("nope"), "s", None).is_empty());
        assert!(discover(temp.path(), "s", Some("missing")).is_empty());
    }

    #[test]
    fn test_discovery_is_idempotent() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/b");
        skill(temp.path(), "skills/a");
        skill(temp.path(), "skills/C");

        let first = discover(temp.path(), "s", None);
        let second = discover(temp.path(), "s", None);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["skills/a", "skills/b", "skills/C"]);
    }

    #[test]
    fn test_overlapping_roots_deduplicate() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/a");

        let mut found = Vec::new();
        scan_root(&temp.path().join("skills"), temp.path(), "s", &mut found);
        scan_root(temp.path(), temp.path(), "s", &mut found);
        assert_eq!(found.len(), 2);
        assert_eq!(finish(found).len(), 1);
    }

    #[test]
    fn test_skill_folder_source() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "mine/solo");
        let source = Source::local(&temp.path().join("mine/solo")).expect("source");

        let bundles = discover_source(&source, &source.local_path().expect("path"));
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].slug, "solo");
        assert_eq!(bundles[0].id, format!("{}:solo", source.id));
    }

    #[test]
    fn test_local_folder_scans_itself() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "pack/one");
        skill(temp.path(), "pack/nested/two");
        let source = Source::local(&temp.path().join("pack")).expect("source");

        let bundles = discover_source(&source, &source.local_path().expect("path"));
        assert_eq!(ids(&bundles), vec!["one", "nested/two"]);
    }

    #[test]
    fn test_skills_sh_filters_by_slug() {
        let temp = TempDir::new().expect("temp dir");
        skill(temp.path(), "skills/pdf");
        skill(temp.path(), "skills/docx");
        let source = Source::skills_sh(
            "https://skills.sh/acme/tools/pdf",
            crate::source::reference::resolve_skills_sh("https://skills.sh/acme/tools/pdf").expect("ref"),
        );

        let bundles = discover_source(&source, temp.path());
        assert_eq!(ids(&bundles), vec!["skills/pdf"]);
    }
}
