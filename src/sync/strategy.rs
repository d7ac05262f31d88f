//! Credential fallback chain
//!
//! Each tier is a pure planning step: given the URL and the failures so far it
//! either produces an [`Attempt`] or declines. [`run_with_fallback`] walks the
//! tiers in order, stops at the first success, and stops early on any failure
//! that is not authentication-related.

use tracing::{debug, warn};

use super::accounts::AccountProvider;
use crate::git::error::is_auth_failure;
use crate::git::url::{is_http_url, ssh_equivalent};
use crate::git::url_parser::host_of;
use crate::git::{Credentials, TransportError};
use crate::source::AuthMode;

/// Credential tier of the fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// No explicit token; SSH agent, keys and credential helpers only
    Ambient,
    /// Token of the default account session
    DefaultAccount,
    /// Token of a freshly selected account (recognised providers only)
    ReselectAccount,
    /// Same repository over SSH (clone only)
    SshFallback,
}

/// Tiers tried for clones
pub const CLONE_TIERS: &[Tier] = &[Tier::Ambient, Tier::DefaultAccount, Tier::ReselectAccount, Tier::SshFallback];

/// Tiers tried for pulls
pub const PULL_TIERS: &[Tier] = &[Tier::Ambient, Tier::DefaultAccount, Tier::ReselectAccount];

/// One concrete transport attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub tier: Tier,
    pub url: String,
    pub credentials: Credentials,
}

impl Attempt {
    pub fn auth_mode(&self) -> AuthMode {
        match self.tier {
            Tier::SshFallback => AuthMode::Ssh,
            _ if self.credentials.token.is_some() => AuthMode::Token,
            _ => AuthMode::Ambient,
        }
    }
}

/// A failed attempt and its transport message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub tier: Tier,
    pub url: String,
    pub message: String,
}

/// Every attempt of the chain failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackError {
    pub failures: Vec<FailedAttempt>,
}

impl FallbackError {
    /// Last failure over the original URL
    pub fn primary(&self) -> Option<&FailedAttempt> {
        self.failures.iter().rev().find(|f| f.tier != Tier::SshFallback)
    }

    /// The SSH fallback failure, when that tier ran
    pub fn ssh(&self) -> Option<&FailedAttempt> {
        self.failures.iter().find(|f| f.tier == Tier::SshFallback)
    }

    pub fn last_message(&self) -> &str {
        self.failures.last().map_or("no credential strategy applied", |f| f.message.as_str())
    }
}

fn token_attempt(tier: Tier, url: &str, token: String, tried: &[Attempt]) -> Option<Attempt> {
    let credentials = Credentials::token(token);
    if tried.iter().any(|attempt| attempt.credentials == credentials && attempt.url == url) {
        return None;
    }
    Some(Attempt {
        tier,
        url: url.to_string(),
        credentials,
    })
}

/// Decide what `tier` should try for `url`, `None` to skip it
pub fn plan(tier: Tier, url: &str, tried: &[Attempt], accounts: &mut dyn AccountProvider) -> Option<Attempt> {
    let token_host = is_http_url(url).then(|| host_of(url)).flatten();

    match tier {
        Tier::Ambient => Some(Attempt {
            tier,
            url: url.to_string(),
            credentials: Credentials::ambient(),
        }),
        Tier::DefaultAccount => {
            let host = token_host?;
            match accounts.default_session(host) {
                Ok(session) => token_attempt(tier, url, session?.token, tried),
                Err(err) => {
                    warn!(host, "Skipping default account: {err}");
                    None
                }
            }
        }
        Tier::ReselectAccount => {
            let host = token_host.filter(|host| accounts.is_provider(host))?;
            match accounts.reselect_session(host) {
                Ok(session) => token_attempt(tier, url, session?.token, tried),
                Err(err) => {
                    warn!(host, "Skipping account re-selection: {err}");
                    None
                }
            }
        }
        Tier::SshFallback => {
            let ssh_url = ssh_equivalent(url)?;
            Some(Attempt {
                tier,
                url: ssh_url,
                credentials: Credentials::ambient(),
            })
        }
    }
}

/// Run `operation` through `tiers` until one attempt succeeds
///
/// A failure the classifier does not consider authentication-related ends the
/// chain immediately: retrying with other credentials cannot help.
pub fn run_with_fallback<T, F>(
    tiers: &[Tier],
    url: &str,
    accounts: &mut dyn AccountProvider,
    mut operation: F,
) -> Result<(T, Attempt), FallbackError>
where
    F: FnMut(&Attempt) -> Result<T, TransportError>,
{
    let mut tried: Vec<Attempt> = Vec::new();
    let mut failures: Vec<FailedAttempt> = Vec::new();

    for &tier in tiers {
        if failures.last().is_some_and(|last| !is_auth_failure(&last.message)) {
            debug!(?tier, "Not an authentication failure, stopping fallback chain");
            break;
        }

        let Some(attempt) = plan(tier, url, &tried, accounts) else {
            debug!(?tier, "Credential tier not applicable");
            continue;
        };

        debug!(?tier, url = %attempt.url, "Trying credential tier");
        match operation(&attempt) {
            Ok(value) => return Ok((value, attempt)),
            Err(err) => {
                debug!(?tier, "Attempt failed: {}", err.message);
                failures.push(FailedAttempt {
                    tier,
                    url: attempt.url.clone(),
                    message: err.message,
                });
                tried.push(attempt);
            }
        }
    }

    Err(FallbackError { failures })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::sync::accounts::AccountSession;

    struct FakeAccounts {
        default_token: Option<&'static str>,
        reselect_token: Option<&'static str>,
        providers: Vec<&'static str>,
        reselect_calls: usize,
    }

    impl FakeAccounts {
        fn new(default_token: Option<&'static str>, reselect_token: Option<&'static str>) -> Self {
            Self {
                default_token,
                reselect_token,
                providers: vec!["github.com"],
                reselect_calls: 0,
            }
        }
    }

    fn session(token: &str) -> AccountSession {
        AccountSession {
            account: "test".to_string(),
            token: token.to_string(),
        }
    }

    impl AccountProvider for FakeAccounts {
        fn is_provider(&self, host: &str) -> bool {
            self.providers.iter().any(|provider| *provider == host)
        }

        fn default_session(&mut self, _host: &str) -> crate::error::Result<Option<AccountSession>> {
            Ok(self.default_token.map(session))
        }

        fn reselect_session(&mut self, _host: &str) -> crate::error::Result<Option<AccountSession>> {
            self.reselect_calls += 1;
            Ok(self.reselect_token.map(session))
        }
    }

    const URL: &str = "https://github.com/acme/private";
    const AUTH_FAILURE: &str = "remote: Repository not found.";

    fn fail(message: &str) -> Result<(), TransportError> {
        Err(TransportError::new(message))
    }

    #[test]
    fn test_first_success_wins() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let (_, attempt) = run_with_fallback(CLONE_TIERS, URL, &mut accounts, |_| Ok(())).expect("success");
        assert_eq!(attempt.tier, Tier::Ambient);
        assert_eq!(attempt.auth_mode(), AuthMode::Ambient);
        assert_eq!(accounts.reselect_calls, 0);
    }

    #[test]
    fn test_falls_back_in_order() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let mut seen = Vec::new();
        let (_, attempt) = run_with_fallback(CLONE_TIERS, URL, &mut accounts, |attempt| {
            seen.push((attempt.tier, attempt.credentials.token.clone()));
            if attempt.credentials.token.as_deref() == Some("t2") {
                Ok(())
            } else {
                fail(AUTH_FAILURE)
            }
        })
        .expect("success");

        assert_eq!(
            seen,
            vec![
                (Tier::Ambient, None),
                (Tier::DefaultAccount, Some("t1".to_string())),
                (Tier::ReselectAccount, Some("t2".to_string())),
            ]
        );
        assert_eq!(attempt.auth_mode(), AuthMode::Token);
    }

    #[test]
    fn test_non_auth_failure_stops_chain() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let mut calls = 0;
        let err = run_with_fallback(CLONE_TIERS, URL, &mut accounts, |_| {
            calls += 1;
            fail("failed to resolve address for github.com: Name or service not known")
        })
        .expect_err("should fail");

        assert_eq!(calls, 1);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(accounts.reselect_calls, 0);
    }

    #[test]
    fn test_ssh_fallback_after_auth_failures() {
        let mut accounts = FakeAccounts::new(Some("t1"), None);
        let (_, attempt) = run_with_fallback(CLONE_TIERS, URL, &mut accounts, |attempt| {
            if attempt.tier == Tier::SshFallback {
                Ok(())
            } else {
                fail(AUTH_FAILURE)
            }
        })
        .expect("success");

        assert_eq!(attempt.url, "git@github.com:acme/private.git");
        assert_eq!(attempt.auth_mode(), AuthMode::Ssh);
    }

    #[test]
    fn test_ssh_fallback_without_any_token() {
        let mut accounts = FakeAccounts::new(None, None);
        let err = run_with_fallback(CLONE_TIERS, URL, &mut accounts, |_| fail(AUTH_FAILURE))
            .expect_err("should fail");

        let tiers: Vec<Tier> = err.failures.iter().map(|f| f.tier).collect();
        assert_eq!(tiers, vec![Tier::Ambient, Tier::SshFallback]);
        assert_eq!(err.primary().map(|f| f.tier), Some(Tier::Ambient));
        assert!(err.ssh().is_some());
    }

    #[test]
    fn test_pull_never_uses_ssh_fallback() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let err = run_with_fallback(PULL_TIERS, URL, &mut accounts, |_| fail(AUTH_FAILURE))
            .expect_err("should fail");
        assert!(err.ssh().is_none());
        assert_eq!(err.failures.len(), 3);
    }

    #[test]
    fn test_reselect_skipped_for_unknown_host() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let err = run_with_fallback(
            PULL_TIERS,
            "https://git.example.com/acme/tools",
            &mut accounts,
            |_| fail(AUTH_FAILURE),
        )
        .expect_err("should fail");

        assert_eq!(accounts.reselect_calls, 0);
        assert_eq!(err.failures.len(), 2);
    }

    #[test]
    fn test_same_token_is_not_retried() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t1"));
        let err = run_with_fallback(PULL_TIERS, URL, &mut accounts, |_| fail(AUTH_FAILURE))
            .expect_err("should fail");
        let tiers: Vec<Tier> = err.failures.iter().map(|f| f.tier).collect();
        assert_eq!(tiers, vec![Tier::Ambient, Tier::DefaultAccount]);
    }

    #[test]
    fn test_ssh_urls_skip_token_tiers() {
        let mut accounts = FakeAccounts::new(Some("t1"), Some("t2"));
        let err = run_with_fallback(
            CLONE_TIERS,
            "git@github.com:acme/private.git",
            &mut accounts,
            |_| fail(AUTH_FAILURE),
        )
        .expect_err("should fail");
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].tier, Tier::Ambient);
    }
}
