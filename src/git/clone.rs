//! Repository cloning operations

use std::path::Path;

use git2::build::RepoBuilder;

use super::TransportError;
use super::auth::{Credentials, fetch_options};
use super::url::{is_local_url, transport_url};

/// Clone `url` into `target`, shallow for remote URLs, optionally on `branch`
///
/// libgit2 removes the target directory again when a clone it created fails,
/// so a failed attempt never leaves a checkout that looks valid.
pub fn clone(
    url: &str,
    target: &Path,
    branch: Option<&str>,
    credentials: &Credentials,
) -> Result<(), TransportError> {
    // Shallow fetches are not supported for local paths
    let depth = (!is_local_url(url)).then_some(1);
    let options = fetch_options(credentials, depth);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(options);
    if let Some(branch) = branch {
        builder.branch(branch);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TransportError::new(e.to_string()))?;
    }

    builder.clone(&transport_url(url), target)?;
    Ok(())
}
