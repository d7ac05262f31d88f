//! Fast-forward-only pull for existing checkouts

use std::path::Path;

use git2::Repository;
use git2::build::CheckoutBuilder;

use super::TransportError;
use super::auth::{Credentials, fetch_options};
use super::checkout::head_branch;

/// What a pull did to the checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    FastForwarded,
}

/// Fetch `branch` (or the current branch) from `origin` and fast-forward to it
pub fn pull_fast_forward(
    path: &Path,
    branch: Option<&str>,
    credentials: &Credentials,
) -> Result<PullOutcome, TransportError> {
    let repo = Repository::open(path)?;
    let branch = match branch {
        Some(branch) => branch.to_string(),
        None => head_branch(&repo)
            .ok_or_else(|| TransportError::new("HEAD is detached; cannot determine branch to pull"))?,
    };

    let mut remote = repo.find_remote("origin")?;
    let mut options = fetch_options(credentials, None);
    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    remote.fetch(&[refspec.as_str()], Some(&mut options), None)?;

    let fetched = repo.find_reference(&format!("refs/remotes/origin/{branch}"))?;
    let incoming = repo.reference_to_annotated_commit(&fetched)?;
    let (analysis, _) = repo.merge_analysis(&[&incoming])?;

    if analysis.is_up_to_date() {
        return Ok(PullOutcome::UpToDate);
    }

    if !analysis.is_fast_forward() {
        return Err(TransportError::new(format!(
            "Not possible to fast-forward '{branch}': local and remote histories have diverged"
        )));
    }

    let local_ref = format!("refs/heads/{branch}");
    match repo.find_reference(&local_ref) {
        Ok(mut reference) => {
            reference.set_target(incoming.id(), "skillsync: fast-forward")?;
        }
        Err(_) => {
            repo.reference(&local_ref, incoming.id(), true, "skillsync: fast-forward")?;
        }
    }
    repo.set_head(&local_ref)?;
    repo.checkout_head(Some(CheckoutBuilder::new().force()))?;

    Ok(PullOutcome::FastForwarded)
}
