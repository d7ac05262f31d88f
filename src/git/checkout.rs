//! Branch checkout for existing checkouts

use std::path::Path;

use git2::Repository;
use git2::build::CheckoutBuilder;

use super::TransportError;

/// Switch the working tree of `path` to `branch`
///
/// Creates the local branch from `origin/<branch>` when only the
/// remote-tracking ref exists.
pub fn checkout_branch(path: &Path, branch: &str) -> Result<(), TransportError> {
    let repo = Repository::open(path)?;
    let local_ref = format!("refs/heads/{branch}");

    if repo.find_reference(&local_ref).is_err() {
        let remote_ref = repo
            .find_reference(&format!("refs/remotes/origin/{branch}"))
            .map_err(|_| TransportError::new(format!("branch '{branch}' not found in checkout")))?;
        let commit = remote_ref.peel_to_commit()?;
        let mut created = repo.branch(branch, &commit, false)?;
        created.set_upstream(Some(&format!("origin/{branch}")))?;
    }

    repo.set_head(&local_ref)?;
    repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
    Ok(())
}

/// Name of the branch HEAD points at, `None` when detached
pub fn head_branch(repo: &Repository) -> Option<String> {
    let head = repo.head().ok()?;
    if head.is_branch() {
        head.shorthand().map(str::to_string)
    } else {
        None
    }
}
