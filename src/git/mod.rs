//! Git operations for source checkouts
//!
//! This module handles:
//! - Shallow cloning of a single ref (HTTPS, SSH and local file URLs)
//! - Branch checkout inside an existing checkout
//! - Fast-forward-only pulls
//! - Ambient and token authentication ([`auth`])
//! - Classifying transport failures ([`error`])
//!
//! Callers go through the [`GitTransport`] trait so the credential fallback
//! chain can be driven against a scripted transport in tests.

pub mod auth;
pub mod checkout;
pub mod clone;
pub mod error;
pub mod pull;
pub mod url;
pub mod url_parser;

use std::fmt;
use std::path::Path;

pub use auth::Credentials;
pub use pull::PullOutcome;

/// Raw failure reported by the git transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<git2::Error> for TransportError {
    fn from(err: git2::Error) -> Self {
        Self::new(err.message())
    }
}

/// The clone/pull/checkout operations the synchronizer needs
pub trait GitTransport {
    /// Clone `url` into `target`, on `branch` when given
    fn clone_repo(
        &self,
        url: &str,
        target: &Path,
        branch: Option<&str>,
        credentials: &Credentials,
    ) -> Result<(), TransportError>;

    /// Fast-forward `checkout` to the remote state of `branch` (or the current branch)
    fn pull(
        &self,
        checkout: &Path,
        branch: Option<&str>,
        credentials: &Credentials,
    ) -> Result<PullOutcome, TransportError>;

    /// Switch `checkout` to `branch`
    fn checkout(&self, checkout: &Path, branch: &str) -> Result<(), TransportError>;

    /// URL of the `origin` remote of `checkout`
    fn origin_url(&self, checkout: &Path) -> Option<String>;
}

/// [`GitTransport`] backed by libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Transport;

impl GitTransport for Git2Transport {
    fn clone_repo(
        &self,
        url: &str,
        target: &Path,
        branch: Option<&str>,
        credentials: &Credentials,
    ) -> Result<(), TransportError> {
        clone::clone(url, target, branch, credentials)
    }

    fn pull(
        &self,
        checkout: &Path,
        branch: Option<&str>,
        credentials: &Credentials,
    ) -> Result<PullOutcome, TransportError> {
        pull::pull_fast_forward(checkout, branch, credentials)
    }

    fn checkout(&self, checkout: &Path, branch: &str) -> Result<(), TransportError> {
        checkout::checkout_branch(checkout, branch)
    }

    fn origin_url(&self, checkout: &Path) -> Option<String> {
        let repo = git2::Repository::open(checkout).ok()?;
        let remote = repo.find_remote("origin").ok()?;
        remote.url().map(str::to_string)
    }
}

/// Whether `path` holds a git checkout
pub fn is_checkout(path: &Path) -> bool {
    path.join(".git").exists()
}
