//! Destination folder names
//!
//! A bundle's destination name is derived from its slug alone. The transform
//! is deterministic but not collision-resistant, so desired sets are checked
//! for shared names before anything touches the disk.

use std::collections::BTreeMap;

use crate::discovery::SkillBundle;
use crate::error::materialize::name_conflict;
use crate::error::{NameConflict, Result};

use super::manifest::MANIFEST_FILE;

/// Name used when a slug sanitizes to nothing usable
pub const PLACEHOLDER: &str = "skill";

fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
}

/// Lowercase `slug` and collapse every run of characters outside
/// `[a-z0-9._-]` into a single `-`
pub fn sanitize(slug: &str) -> String {
    let mut name = String::with_capacity(slug.len());
    let mut in_run = false;
    for c in slug.chars().flat_map(char::to_lowercase) {
        if is_allowed(c) {
            name.push(c);
            in_run = false;
        } else if !in_run {
            name.push('-');
            in_run = true;
        }
    }

    if name.is_empty() || name.chars().all(|c| c == '.') || name == MANIFEST_FILE {
        return PLACEHOLDER.to_string();
    }
    name
}

/// Whether `name` is safe to join onto the destination root
pub fn is_folder_name(name: &str) -> bool {
    !name.is_empty()
        && name != MANIFEST_FILE
        && !name.chars().all(|c| c == '.')
        && !name.contains(['/', '\\'])
}

/// Assign destination names to `bundles`, failing on any shared name
///
/// The result is sorted by name. Bundles repeated with the same id count once.
pub fn assign<'a>(bundles: &'a [SkillBundle]) -> Result<Vec<(String, &'a SkillBundle)>> {
    let mut by_name: BTreeMap<String, Vec<&'a SkillBundle>> = BTreeMap::new();
    for bundle in bundles {
        let group = by_name.entry(sanitize(&bundle.slug)).or_default();
        if !group.iter().any(|existing| existing.id == bundle.id) {
            group.push(bundle);
        }
    }

    let conflicts: Vec<NameConflict> = by_name
        .iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(name, group)| NameConflict {
            name: name.clone(),
            bundles: group
                .iter()
                .map(|bundle| (bundle.slug.clone(), bundle.absolute_path.display().to_string()))
                .collect(),
        })
        .collect();
    if !conflicts.is_empty() {
        return Err(name_conflict(conflicts));
    }

    Ok(by_name
        .into_iter()
        .filter_map(|(name, group)| group.first().map(|bundle| (name, *bundle)))
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::SkillsyncError;
    use std::path::PathBuf;

    fn bundle(source: &str, path: &str) -> SkillBundle {
        let slug = path.rsplit('/').next().unwrap_or(path).to_string();
        SkillBundle {
            id: format!("{source}:{path}"),
            source_id: source.to_string(),
            slug,
            relative_path: path.to_string(),
            absolute_path: PathBuf::from(format!("/cache/{source}/{path}")),
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("pdf-filler"), "pdf-filler");
        assert_eq!(sanitize("PDF Filler"), "pdf-filler");
        assert_eq!(sanitize("a  &&  b"), "a-b");
        assert_eq!(sanitize("v1.2_final"), "v1.2_final");
        assert_eq!(sanitize("Ünïcode"), "-n-code");
        assert_eq!(sanitize("日本"), "-");
    }

    #[test]
    fn test_sanitize_placeholder() {
        assert_eq!(sanitize(""), PLACEHOLDER);
        assert_eq!(sanitize("."), PLACEHOLDER);
        assert_eq!(sanitize(".."), PLACEHOLDER);
        assert_eq!(sanitize(".manifest.json"), PLACEHOLDER);
    }

    #[test]
    fn test_sanitize_is_stable() {
        for slug in ["Alpha", "beta gamma", "x/y"] {
            assert_eq!(sanitize(slug), sanitize(slug));
            assert!(is_folder_name(&sanitize(slug)));
        }
    }

    #[test]
    fn test_is_folder_name() {
        assert!(is_folder_name("alpha"));
        assert!(!is_folder_name(".."));
        assert!(!is_folder_name("a/b"));
        assert!(!is_folder_name(MANIFEST_FILE));
        assert!(!is_folder_name(""));
    }

    #[test]
    fn test_assign_sorted_and_deduplicated() {
        let bundles = vec![bundle("s", "skills/beta"), bundle("s", "skills/Alpha"), bundle("s", "skills/beta")];
        let assigned = assign(&bundles).expect("assign");
        let names: Vec<&str> = assigned.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_assign_reports_every_conflict() {
        let bundles = vec![
            bundle("s1", "skills/My Skill"),
            bundle("s2", "skills/my-skill"),
            bundle("s1", "skills/tool"),
            bundle("s2", "packs/tool"),
            bundle("s1", "skills/unique"),
        ];
        let err = assign(&bundles).expect_err("should conflict");
        match err {
            SkillsyncError::NameConflict { conflicts } => {
                assert_eq!(conflicts.len(), 2);
                assert_eq!(conflicts[0].name, "my-skill");
                assert_eq!(conflicts[0].bundles.len(), 2);
                assert_eq!(conflicts[1].name, "tool");
                assert!(conflicts[1].bundles[1].1.contains("packs/tool"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
