//! Git URL parsing utilities
//!
//! Provides string-level helpers for the repository reference shapes the
//! resolver accepts. None of these allocate a canonical form; that is left to
//! [`crate::source::reference`].

/// Split an `http(s)://` URL into `(scheme, rest)`
pub fn split_http_scheme(input: &str) -> Option<(&str, &str)> {
    if let Some(rest) = input.strip_prefix("https://") {
        Some(("https", rest))
    } else if let Some(rest) = input.strip_prefix("http://") {
        Some(("http", rest))
    } else {
        None
    }
}

/// Drop `?query` and `#fragment` from a URL remainder
pub fn strip_query_and_fragment(rest: &str) -> &str {
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Remove a trailing `.git` from a repository name
pub fn trim_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}

/// Split `host/seg/seg...` into the host and its non-empty path segments
pub fn host_and_segments(rest: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = rest.split('/');
    let host = parts.next().filter(|h| !h.is_empty())?;
    Some((host, parts.filter(|s| !s.is_empty()).collect()))
}

/// A single path segment that is not `.`/`..` and carries no separators or URL syntax
pub fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.chars().any(|c| c.is_whitespace() || matches!(c, '?' | '#' | ':' | '@' | '\\'))
}

/// Check for the bare SCP-style SSH form `git@host:owner/repo[.git]`
pub fn is_bare_ssh(input: &str) -> bool {
    let Some(rest) = input.strip_prefix("git@") else {
        return false;
    };
    let Some((host, path)) = rest.split_once(':') else {
        return false;
    };
    if host.is_empty() || host.contains('/') {
        return false;
    }
    let segments: Vec<&str> = path.split('/').collect();
    segments.len() == 2 && segments.iter().all(|s| is_plain_segment(s)) && !trim_git_suffix(segments[1]).is_empty()
}

/// Check for the bare HTTPS form `https://host/owner/repo[.git]` (no slash, query or extra segments)
pub fn is_bare_https(input: &str) -> bool {
    let Some(rest) = input.strip_prefix("https://") else {
        return false;
    };
    let parts: Vec<&str> = rest.split('/').collect();
    parts.len() == 3
        && !parts[0].is_empty()
        && is_plain_segment(parts[1])
        && is_plain_segment(parts[2])
        && !trim_git_suffix(parts[2]).is_empty()
}

/// Parsed `scheme://host/owner/repo/tree/<branch>/<path...>` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeUrl<'a> {
    pub scheme: &'a str,
    pub host: &'a str,
    pub owner: &'a str,
    pub repo: &'a str,
    /// `None` when the URL ends right after `/tree`
    pub branch: Option<&'a str>,
    /// Segments after the branch; may be empty
    pub path: Vec<&'a str>,
}

/// Parse a web UI "tree" URL pointing into a repository
///
/// Returns `None` when the URL does not have `tree` as its third path segment.
pub fn parse_tree_url(input: &str) -> Option<TreeUrl<'_>> {
    let (scheme, rest) = split_http_scheme(input)?;
    let (host, segments) = host_and_segments(strip_query_and_fragment(rest))?;

    if segments.len() < 3 || segments[2] != "tree" {
        return None;
    }

    Some(TreeUrl {
        scheme,
        host,
        owner: segments[0],
        repo: segments[1],
        branch: segments.get(3).copied(),
        path: segments.get(4..).map(<[&str]>::to_vec).unwrap_or_default(),
    })
}

/// Parse a plain `scheme://host/owner/repo[/][?query]` URL into `(scheme, host, owner, repo)`
pub fn parse_plain_repo_url(input: &str) -> Option<(&str, &str, &str, &str)> {
    let (scheme, rest) = split_http_scheme(input)?;
    let (host, segments) = host_and_segments(strip_query_and_fragment(rest))?;
    match segments.as_slice() {
        [owner, repo] if is_plain_segment(owner) && is_plain_segment(repo) => {
            Some((scheme, host, owner, repo))
        }
        _ => None,
    }
}

/// Extract the host from an HTTPS or SCP-style SSH URL
pub fn host_of(url: &str) -> Option<&str> {
    if let Some((_, rest)) = split_http_scheme(url) {
        let host = rest.split('/').next()?;
        // Drop userinfo and port
        let host = host.rsplit('@').next()?;
        return host.split(':').next().filter(|h| !h.is_empty());
    }
    if let Some(rest) = url.strip_prefix("ssh://") {
        let authority = rest.split('/').next()?;
        let host = authority.rsplit('@').next()?;
        return host.split(':').next().filter(|h| !h.is_empty());
    }
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split(':').next().filter(|h| !h.is_empty());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_bare_ssh() {
        assert!(is_bare_ssh("git@github.com:acme/tools.git"));
        assert!(is_bare_ssh("git@github.com:acme/tools"));
        assert!(!is_bare_ssh("git@github.com:acme"));
        assert!(!is_bare_ssh("git@github.com:acme/tools/extra"));
        assert!(!is_bare_ssh("ssh://git@github.com/acme/tools"));
        assert!(!is_bare_ssh("git@github.com:acme/.git"));
    }

    #[test]
    fn test_is_bare_https() {
        assert!(is_bare_https("https://github.com/acme/tools"));
        assert!(is_bare_https("https://github.com/acme/tools.git"));
        assert!(!is_bare_https("https://github.com/acme/tools/"));
        assert!(!is_bare_https("https://github.com/acme/tools?tab=readme"));
        assert!(!is_bare_https("http://github.com/acme/tools"));
        assert!(!is_bare_https("https://github.com/acme"));
    }

    #[test]
    fn test_parse_tree_url() {
        let tree = parse_tree_url("https://github.com/acme/tools/tree/main/skills/core")
            .expect("tree url");
        assert_eq!(tree.host, "github.com");
        assert_eq!(tree.owner, "acme");
        assert_eq!(tree.repo, "tools");
        assert_eq!(tree.branch, Some("main"));
        assert_eq!(tree.path, vec!["skills", "core"]);
    }

    #[test]
    fn test_parse_tree_url_without_path() {
        let tree = parse_tree_url("https://github.com/acme/tools/tree/main").expect("tree url");
        assert_eq!(tree.branch, Some("main"));
        assert!(tree.path.is_empty());

        let bare = parse_tree_url("https://github.com/acme/tools/tree").expect("tree url");
        assert_eq!(bare.branch, None);
    }

    #[test]
    fn test_parse_tree_url_rejects_other_shapes() {
        assert!(parse_tree_url("https://github.com/acme/tools").is_none());
        assert!(parse_tree_url("https://github.com/acme/tools/blob/main/README.md").is_none());
        assert!(parse_tree_url("git@github.com:acme/tools").is_none());
    }

    #[test]
    fn test_parse_plain_repo_url() {
        assert_eq!(
            parse_plain_repo_url("https://github.com/acme/tools/?tab=readme"),
            Some(("https", "github.com", "acme", "tools"))
        );
        assert_eq!(parse_plain_repo_url("https://github.com/acme"), None);
        assert_eq!(parse_plain_repo_url("https://github.com/a/b/c"), None);
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://github.com/acme/tools"), Some("github.com"));
        assert_eq!(host_of("https://user@host.example:8443/a/b"), Some("host.example"));
        assert_eq!(host_of("git@github.com:acme/tools.git"), Some("github.com"));
        assert_eq!(host_of("ssh://git@github.com/acme/tools"), Some("github.com"));
        assert_eq!(host_of("file:///tmp/repo"), None);
    }
}
