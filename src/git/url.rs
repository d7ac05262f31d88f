//! URL normalization for git operations
//!
//! This module handles:
//! - Normalizing SCP-style SSH URLs to ssh:// for libgit2
//! - Normalizing file:// URLs for libgit2
//! - Deriving the SSH equivalent of an HTTPS repository URL

use std::borrow::Cow;

use super::url_parser::{host_and_segments, split_http_scheme, strip_query_and_fragment, trim_git_suffix};

/// Normalize SSH URLs from SCP-style (git@host:path) to ssh:// format.
///
/// libgit2 may have issues with SCP-style SSH URLs, so they are converted to
/// the explicit ssh:// form before cloning.
pub fn normalize_ssh_url_for_clone(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host_part, path_part)) => {
            let path_part = path_part.trim_start_matches('/');
            Cow::Owned(format!("ssh://{host_part}/{path_part}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Normalize file:// URLs so libgit2 can resolve them on Unix.
pub fn normalize_file_url_for_clone(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    if after.contains('\\') {
        return Cow::Owned(format!("file:///{}", after.replace('\\', "/").trim_start_matches('/')));
    }
    if !after.is_empty() && !after.starts_with('/') {
        return Cow::Owned(format!("file:///{after}"));
    }
    Cow::Borrowed(url)
}

/// URL handed to libgit2 for `url`
pub fn transport_url(url: &str) -> String {
    let url = normalize_ssh_url_for_clone(url);
    normalize_file_url_for_clone(&url).into_owned()
}

/// Whether `url` points at the local file system (no shallow fetch, no auth)
pub fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || std::path::Path::new(url).is_absolute()
}

/// Whether `url` is an HTTP(S) URL
pub fn is_http_url(url: &str) -> bool {
    split_http_scheme(url).is_some()
}

/// Derive `git@host:owner/repo.git` from `https://host/owner/repo[.git]`
///
/// Returns `None` for anything but a two-segment HTTP(S) repository URL.
pub fn ssh_equivalent(url: &str) -> Option<String> {
    let (_, rest) = split_http_scheme(url)?;
    let (host, segments) = host_and_segments(strip_query_and_fragment(rest))?;
    let host = host.rsplit('@').next()?.split(':').next()?;
    match segments.as_slice() {
        [owner, repo] => Some(format!("git@{host}:{owner}/{}.git", trim_git_suffix(repo))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ssh_url_scp_style() {
        assert_eq!(
            normalize_ssh_url_for_clone("git@github.com:user/repo.git"),
            "ssh://git@github.com/user/repo.git"
        );
        assert_eq!(
            normalize_ssh_url_for_clone("git@github.com:/absolute/path/repo.git"),
            "ssh://git@github.com/absolute/path/repo.git"
        );
    }

    #[test]
    fn test_normalize_ssh_url_leaves_others() {
        assert_eq!(
            normalize_ssh_url_for_clone("ssh://git@github.com/user/repo.git"),
            "ssh://git@github.com/user/repo.git"
        );
        assert_eq!(
            normalize_ssh_url_for_clone("https://github.com/user/repo.git"),
            "https://github.com/user/repo.git"
        );
    }

    #[test]
    fn test_normalize_file_url() {
        assert_eq!(normalize_file_url_for_clone("file:///tmp/repo"), "file:///tmp/repo");
        assert_eq!(normalize_file_url_for_clone("file://tmp/repo"), "file:///tmp/repo");
        assert_eq!(
            normalize_file_url_for_clone("file://C:\\Temp\\repo"),
            "file:///C:/Temp/repo"
        );
    }

    #[test]
    fn test_ssh_equivalent() {
        assert_eq!(
            ssh_equivalent("https://github.com/acme/tools"),
            Some("git@github.com:acme/tools.git".to_string())
        );
        assert_eq!(
            ssh_equivalent("https://github.com/acme/tools.git"),
            Some("git@github.com:acme/tools.git".to_string())
        );
        assert_eq!(ssh_equivalent("https://github.com/acme"), None);
        assert_eq!(ssh_equivalent("git@github.com:acme/tools.git"), None);
        assert_eq!(ssh_equivalent("file:///tmp/repo"), None);
    }

    #[test]
    fn test_is_local_url() {
        assert!(is_local_url("file:///tmp/repo"));
        assert!(is_local_url("/tmp/repo"));
        assert!(!is_local_url("https://github.com/acme/tools"));
        assert!(!is_local_url("git@github.com:acme/tools"));
    }
}
