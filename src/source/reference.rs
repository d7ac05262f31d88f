//! Repository reference resolution
//!
//! Turns user input into a canonical repository reference. Accepted shapes,
//! in precedence order:
//! 1. Bare SSH `git@host:owner/repo[.git]` or bare HTTPS `https://host/owner/repo[.git]`
//! 2. Tree URL `https://host/owner/repo/tree/<branch>/<path...>` (path required)
//! 3. Plain repository URL `https://host/owner/repo/` with trailing slash or query
//!
//! A second resolver maps skills.sh short links
//! (`skills.sh/owner/repo/skill-slug`) to the backing GitHub repository.

use crate::error::Result;
use crate::error::sync::invalid_reference;
use crate::git::url_parser::{
    host_and_segments, is_bare_https, is_bare_ssh, is_plain_segment, parse_plain_repo_url,
    parse_tree_url, split_http_scheme, strip_query_and_fragment, trim_git_suffix,
};

/// Host of the skills.sh directory
pub const SKILLS_SH_HOST: &str = "skills.sh";

/// Host the skills.sh directory links resolve to
pub const SKILLS_SH_REPO_HOST: &str = "github.com";

const EXPECTED_SHAPES: &str =
    "expected https://github.com/owner/repo or https://github.com/owner/repo/tree/<branch>/<folder>";

/// Canonical `{uri, branch?, subPath?}` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub canonical_repo_uri: String,
    pub branch: Option<String>,
    pub skills_root_path: Option<String>,
}

impl ResolvedReference {
    fn repository(canonical_repo_uri: String) -> Self {
        Self {
            canonical_repo_uri,
            branch: None,
            skills_root_path: None,
        }
    }
}

/// A resolved skills.sh short link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillsShReference {
    pub canonical_repo_uri: String,
    pub skill_slug: String,
}

/// Trailing `/` and `.git` normalization for passthrough forms
fn normalize_passthrough(input: &str) -> String {
    trim_git_suffix(input.trim_end_matches('/')).to_string()
}

/// Resolve a repository reference
pub fn resolve(reference: &str) -> Result<ResolvedReference> {
    let input = reference.trim();

    if is_bare_ssh(input) || is_bare_https(input) {
        return Ok(ResolvedReference::repository(normalize_passthrough(input)));
    }

    if let Some(tree) = parse_tree_url(input) {
        let Some(branch) = tree.branch else {
            return Err(invalid_reference(input, "tree URL is missing a branch"));
        };
        if tree.path.is_empty() {
            return Err(invalid_reference(
                input,
                "tree URL must point at a folder inside the repository",
            ));
        }
        if let Some(segment) = tree.path.iter().find(|segment| !is_plain_segment(segment)) {
            return Err(invalid_reference(
                input,
                format!("tree URL path segment '{segment}' is not a plain folder name"),
            ));
        }
        return Ok(ResolvedReference {
            canonical_repo_uri: format!(
                "{}://{}/{}/{}",
                tree.scheme,
                tree.host,
                tree.owner,
                trim_git_suffix(tree.repo)
            ),
            branch: Some(branch.to_string()),
            skills_root_path: Some(tree.path.join("/")),
        });
    }

    if let Some((scheme, host, owner, repo)) = parse_plain_repo_url(input) {
        return Ok(ResolvedReference::repository(format!(
            "{scheme}://{host}/{owner}/{}",
            trim_git_suffix(repo)
        )));
    }

    Err(invalid_reference(input, EXPECTED_SHAPES))
}

/// Whether `input` looks like a skills.sh link (scheme optional)
pub fn is_skills_sh_link(input: &str) -> bool {
    let input = input.trim();
    let rest = split_http_scheme(input).map_or(input, |(_, rest)| rest);
    rest.split('/')
        .next()
        .is_some_and(|host| host.eq_ignore_ascii_case(SKILLS_SH_HOST) || host.eq_ignore_ascii_case("www.skills.sh"))
}

/// Resolve `skills.sh/owner/repo/skill-slug` by positional segment extraction
pub fn resolve_skills_sh(input: &str) -> Result<SkillsShReference> {
    let trimmed = input.trim();
    let rest = split_http_scheme(trimmed).map_or(trimmed, |(_, rest)| rest);
    let Some((host, segments)) = host_and_segments(strip_query_and_fragment(rest)) else {
        return Err(invalid_reference(trimmed, "missing host"));
    };

    if !host.eq_ignore_ascii_case(SKILLS_SH_HOST) && !host.eq_ignore_ascii_case("www.skills.sh") {
        return Err(invalid_reference(
            trimmed,
            format!("expected a {SKILLS_SH_HOST} link, found host '{host}'"),
        ));
    }

    match segments.as_slice() {
        [owner, repo, slug, ..] => Ok(SkillsShReference {
            canonical_repo_uri: format!("https://{SKILLS_SH_REPO_HOST}/{owner}/{}", trim_git_suffix(repo)),
            skill_slug: (*slug).to_string(),
        }),
        _ => Err(invalid_reference(
            trimmed,
            format!("expected {SKILLS_SH_HOST}/<owner>/<repo>/<skill>"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::SkillsyncError;

    fn resolved(uri: &str) -> ResolvedReference {
        ResolvedReference::repository(uri.to_string())
    }

    #[test]
    fn test_bare_https_passthrough() {
        assert_eq!(
            resolve("https://github.com/acme/tools").expect("resolve"),
            resolved("https://github.com/acme/tools")
        );
        assert_eq!(
            resolve("https://github.com/acme/tools.git").expect("resolve"),
            resolved("https://github.com/acme/tools")
        );
    }

    #[test]
    fn test_bare_ssh_passthrough() {
        assert_eq!(
            resolve("git@github.com:acme/tools.git").expect("resolve"),
            resolved("git@github.com:acme/tools")
        );
        assert_eq!(
            resolve("  git@gitlab.example:team/skills  ").expect("resolve"),
            resolved("git@gitlab.example:team/skills")
        );
    }

    #[test]
    fn test_tree_url_extracts_branch_and_path() {
        let reference = resolve("https://github.com/acme/tools/tree/dev/packs/core").expect("resolve");
        assert_eq!(reference.canonical_repo_uri, "https://github.com/acme/tools");
        assert_eq!(reference.branch.as_deref(), Some("dev"));
        assert_eq!(reference.skills_root_path.as_deref(), Some("packs/core"));
    }

    #[test]
    fn test_tree_url_tolerates_trailing_slash_and_query() {
        let reference = resolve("https://github.com/acme/tools/tree/main/skills/?x=1").expect("resolve");
        assert_eq!(reference.branch.as_deref(), Some("main"));
        assert_eq!(reference.skills_root_path.as_deref(), Some("skills"));
    }

    #[test]
    fn test_tree_url_without_folder_is_rejected() {
        let err = resolve("https://github.com/acme/tools/tree/main").expect_err("should fail");
        assert!(matches!(err, SkillsyncError::InvalidReference { .. }));
        let err = resolve("https://github.com/acme/tools/tree/main/").expect_err("should fail");
        assert!(matches!(err, SkillsyncError::InvalidReference { .. }));
        assert!(resolve("https://github.com/acme/tools/tree").is_err());
    }

    #[test]
    fn test_tree_url_with_relative_segments_is_rejected() {
        for input in [
            "https://github.com/acme/tools/tree/main/../../secret",
            "https://github.com/acme/tools/tree/main/skills/..",
            "https://github.com/acme/tools/tree/main/./skills",
            "https://github.com/acme/tools/tree/main/skills\\..\\x",
        ] {
            let err = resolve(input).expect_err(input);
            assert!(matches!(err, SkillsyncError::InvalidReference { .. }), "{input}");
            assert!(err.to_string().contains("not a plain folder name"), "{input}");
        }
    }

    #[test]
    fn test_plain_repo_url_with_slash_or_query() {
        assert_eq!(
            resolve("https://github.com/acme/tools/").expect("resolve"),
            resolved("https://github.com/acme/tools")
        );
        assert_eq!(
            resolve("https://github.com/acme/tools?tab=readme-ov-file").expect("resolve"),
            resolved("https://github.com/acme/tools")
        );
        assert_eq!(
            resolve("http://git.example/acme/tools").expect("resolve"),
            resolved("http://git.example/acme/tools")
        );
    }

    #[test]
    fn test_other_shapes_fail_naming_both_examples() {
        for input in [
            "acme/tools",
            "https://github.com/acme",
            "https://github.com/acme/tools/blob/main/README.md",
            "ftp://example.com/a/b",
            "",
        ] {
            let err = resolve(input).expect_err(input);
            let message = err.to_string();
            assert!(matches!(err, SkillsyncError::InvalidReference { .. }), "{input}");
            if !input.is_empty() {
                assert!(message.contains("https://github.com/owner/repo"), "{message}");
                assert!(message.contains("/tree/"), "{message}");
            }
        }
    }

    #[test]
    fn test_skills_sh_link() {
        let reference = resolve_skills_sh("https://skills.sh/acme/tools/pdf-filler").expect("resolve");
        assert_eq!(reference.canonical_repo_uri, "https://github.com/acme/tools");
        assert_eq!(reference.skill_slug, "pdf-filler");

        let reference = resolve_skills_sh("skills.sh/acme/tools/pdf-filler/").expect("resolve");
        assert_eq!(reference.skill_slug, "pdf-filler");
    }

    #[test]
    fn test_skills_sh_link_failures() {
        assert!(resolve_skills_sh("https://skills.sh/acme/tools").is_err());
        assert!(resolve_skills_sh("https://example.com/acme/tools/x").is_err());
    }

    #[test]
    fn test_is_skills_sh_link() {
        assert!(is_skills_sh_link("https://skills.sh/a/b/c"));
        assert!(is_skills_sh_link("skills.sh/a/b/c"));
        assert!(!is_skills_sh_link("https://github.com/a/b"));
    }
}
