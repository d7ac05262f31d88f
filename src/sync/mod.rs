//! Source synchronization
//!
//! Keeps one git checkout per remote source under
//! `<storageRoot>/source-cache/<sourceId>/`:
//! - No checkout yet: shallow clone, on the registered branch when set
//! - Existing checkout: switch to the registered branch, then fast-forward pull
//!
//! Clone and pull go through the credential fallback chain in [`strategy`].
//! Local sources are only checked for existence.

pub mod accounts;
pub mod strategy;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::sync::failed;
use crate::error::{Result, SkillsyncError, SyncAction};
use crate::git::error::{SSO_HINT, interpret, remedy};
use crate::git::{GitTransport, is_checkout};
use crate::source::{AuthMode, Source, SourceRegistry};

pub use accounts::{AccountProvider, AccountSession, ConfiguredAccounts};
use strategy::{CLONE_TIERS, FallbackError, PULL_TIERS, run_with_fallback};

/// What a sync did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    Cloned,
    Pulled,
    Local,
}

impl std::fmt::Display for SyncKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Self::Cloned => "cloned",
            Self::Pulled => "pulled",
            Self::Local => "local",
        };
        f.write_str(verb)
    }
}

/// Result of a successful sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncKind,
    /// Credential tier that succeeded, `None` for local sources
    pub auth_mode: Option<AuthMode>,
}

/// Per-source result of [`Synchronizer::sync_all`]
#[derive(Debug)]
pub struct SyncReport {
    pub source_id: String,
    pub label: String,
    pub result: Result<SyncOutcome>,
}

/// Cause text that keeps the raw transport message next to its interpretation
fn describe(message: &str) -> String {
    let interpreted = interpret(message);
    if interpreted == message || interpreted.contains(message) {
        interpreted
    } else {
        format!("{interpreted} ({message})")
    }
}

fn fallback_failure(action: SyncAction, source_uri: &str, err: &FallbackError) -> SkillsyncError {
    if let (Some(https), Some(ssh)) = (err.primary(), err.ssh()) {
        let cause = format!(
            "HTTPS: {}; SSH ({}): {}",
            describe(&https.message),
            ssh.url,
            describe(&ssh.message)
        );
        let hint = match remedy(&https.message) {
            Some(text) => format!("{text}\n{SSO_HINT}"),
            None => SSO_HINT.to_string(),
        };
        return failed(action, source_uri, cause, Some(hint));
    }

    let message = err.last_message();
    failed(action, source_uri, describe(message), remedy(message))
}

/// Ensures local checkouts of registered sources exist and are current
pub struct Synchronizer {
    cache_dir: PathBuf,
    transport: Box<dyn GitTransport>,
    accounts: Box<dyn AccountProvider>,
}

impl Synchronizer {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        transport: Box<dyn GitTransport>,
        accounts: Box<dyn AccountProvider>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            transport,
            accounts,
        }
    }

    /// Checkout directory for a source id
    pub fn checkout_path(&self, source_id: &str) -> PathBuf {
        self.cache_dir.join(source_id)
    }

    /// Directory holding the content of `source`
    pub fn content_root(&self, source: &Source) -> PathBuf {
        source
            .local_path()
            .unwrap_or_else(|| self.checkout_path(&source.id))
    }

    /// Bring the local copy of `source` up to date
    pub fn sync(&mut self, source: &Source) -> Result<SyncOutcome> {
        if let Some(path) = source.local_path() {
            if !path.is_dir() {
                return Err(SkillsyncError::InvalidLocalSource {
                    path: source.uri.clone(),
                    reason: "folder no longer exists".to_string(),
                });
            }
            return Ok(SyncOutcome {
                action: SyncKind::Local,
                auth_mode: None,
            });
        }

        let checkout = self.checkout_path(&source.id);
        if is_checkout(&checkout) {
            self.update(source, &checkout)
        } else {
            self.clone_fresh(source, &checkout)
        }
    }

    fn clone_fresh(&mut self, source: &Source, checkout: &Path) -> Result<SyncOutcome> {
        let url = source.repo_url();
        let branch = source.branch.as_deref();
        info!(source = %source.id, url, "Cloning source");

        let transport = self.transport.as_ref();
        let result = run_with_fallback(CLONE_TIERS, url, self.accounts.as_mut(), |attempt| {
            // Leftovers from an earlier attempt would make the clone fail
            if checkout.exists() {
                std::fs::remove_dir_all(checkout)
                    .map_err(|e| crate::git::TransportError::new(e.to_string()))?;
            }
            transport.clone_repo(&attempt.url, checkout, branch, &attempt.credentials)
        });

        match result {
            Ok(((), attempt)) => {
                debug!(source = %source.id, tier = ?attempt.tier, "Clone succeeded");
                Ok(SyncOutcome {
                    action: SyncKind::Cloned,
                    auth_mode: Some(attempt.auth_mode()),
                })
            }
            Err(err) => Err(fallback_failure(SyncAction::Clone, url, &err)),
        }
    }

    fn update(&mut self, source: &Source, checkout: &Path) -> Result<SyncOutcome> {
        let branch = source.branch.as_deref();
        if let Some(branch) = branch {
            self.transport.checkout(checkout, branch).map_err(|err| {
                failed(
                    SyncAction::Checkout,
                    source.repo_url(),
                    describe(&err.message),
                    Some(format!("Check that branch '{branch}' exists, or remove and re-add the source")),
                )
            })?;
        }

        // Pull from wherever the checkout was cloned from (possibly the SSH URL)
        let url = self
            .transport
            .origin_url(checkout)
            .unwrap_or_else(|| source.repo_url().to_string());
        info!(source = %source.id, url = %url, "Pulling source");

        let transport = self.transport.as_ref();
        let result = run_with_fallback(PULL_TIERS, &url, self.accounts.as_mut(), |attempt| {
            transport.pull(checkout, branch, &attempt.credentials)
        });

        match result {
            Ok((outcome, attempt)) => {
                debug!(source = %source.id, ?outcome, tier = ?attempt.tier, "Pull succeeded");
                Ok(SyncOutcome {
                    action: SyncKind::Pulled,
                    auth_mode: Some(attempt.auth_mode()),
                })
            }
            Err(err) => Err(fallback_failure(SyncAction::Pull, source.repo_url(), &err)),
        }
    }

    /// Sync every registered source, recording successes in the registry
    ///
    /// A failing source never stops the others. `on_start` is called with the
    /// source, its 1-based position and the total before each sync.
    pub fn sync_all<F>(&mut self, registry: &mut SourceRegistry, mut on_start: F) -> Vec<SyncReport>
    where
        F: FnMut(&Source, usize, usize),
    {
        let sources: Vec<Source> = registry.list().to_vec();
        let total = sources.len();
        let mut reports = Vec::with_capacity(total);

        for (index, source) in sources.into_iter().enumerate() {
            on_start(&source, index + 1, total);
            let result = self.sync(&source).and_then(|outcome| {
                registry.mark_synced(&source.id, Utc::now(), outcome.auth_mode)?;
                Ok(outcome)
            });
            if let Err(err) = &result {
                warn!(source = %source.id, "Sync failed: {err}");
            }
            reports.push(SyncReport {
                source_id: source.id.clone(),
                label: source.label(),
                result,
            });
        }

        reports
    }

    /// Delete the checkout of `source_id`; `false` when there was none
    pub fn remove_checkout(&self, source_id: &str) -> Result<bool> {
        let checkout = self.checkout_path(source_id);
        if !checkout.exists() {
            return Ok(false);
        }
        std::fs::remove_dir_all(&checkout).map_err(|e| crate::error::fs::write_failed(&checkout, e))?;
        debug!(source = source_id, "Removed checkout");
        Ok(true)
    }
}
