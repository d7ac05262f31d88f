//! Account sessions for token authentication
//!
//! Sessions come from `config.yaml` accounts, with `SKILLSYNC_TOKEN`,
//! `GITHUB_TOKEN` and `GH_TOKEN` acting as an implicit default session for
//! recognised providers. Re-selected accounts are cached in `accounts.json`;
//! `config.yaml` is never written.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AccountConfig, Config};
use crate::error::Result;
use crate::state::StateFile;

/// Environment variables consulted for an implicit default session
pub const TOKEN_ENV_VARS: &[&str] = &["SKILLSYNC_TOKEN", "GITHUB_TOKEN", "GH_TOKEN"];

const ENV_ACCOUNT: &str = "environment";

/// A signed-in account able to produce an access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccountSession {
    pub account: String,
    pub token: String,
}

impl std::fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSession")
            .field("account", &self.account)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Source of account sessions for the credential fallback chain
pub trait AccountProvider {
    /// Whether `host` supports account re-selection
    fn is_provider(&self, host: &str) -> bool;

    /// The cached default session for `host`, if any
    fn default_session(&mut self, host: &str) -> Result<Option<AccountSession>>;

    /// Clear the cached preference for `host` and pick an account again
    fn reselect_session(&mut self, host: &str) -> Result<Option<AccountSession>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountPreferences {
    #[serde(default)]
    preferred_accounts: BTreeMap<String, String>,
}

/// [`AccountProvider`] backed by `config.yaml` and token environment variables
#[derive(Debug)]
pub struct ConfiguredAccounts {
    config: Config,
    /// Host to account name; config preferences overlaid by cached choices
    preferences: BTreeMap<String, String>,
    cache: Option<StateFile<AccountPreferences>>,
    env_token: Option<String>,
    interactive: bool,
}

impl ConfiguredAccounts {
    /// Accounts from `config`, caching re-selections in `cache_file` when given
    pub fn new(config: Config, cache_file: Option<PathBuf>, interactive: bool) -> Result<Self> {
        let env_token = TOKEN_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|t| !t.is_empty()));
        let cache = cache_file.map(StateFile::<AccountPreferences>::load).transpose()?;

        let mut preferences: BTreeMap<String, String> = config
            .preferred_accounts
            .iter()
            .map(|(host, name)| (host.to_lowercase(), name.clone()))
            .collect();
        if let Some(cache) = &cache {
            preferences.extend(cache.get().preferred_accounts.clone());
        }

        Ok(Self {
            config,
            preferences,
            cache,
            env_token,
            interactive,
        })
    }

    /// Replace the environment-derived token
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn accounts_for(&self, host: &str) -> Vec<&AccountConfig> {
        self.config
            .accounts
            .iter()
            .filter(|account| account.host.eq_ignore_ascii_case(host))
            .collect()
    }

    fn session_for(account: &AccountConfig) -> Option<AccountSession> {
        account.resolve_token().map(|token| AccountSession {
            account: account.name.clone(),
            token,
        })
    }

    fn env_session(&self, host: &str) -> Option<AccountSession> {
        if !self.config.is_provider(host) {
            return None;
        }
        self.env_token.as_ref().map(|token| AccountSession {
            account: ENV_ACCOUNT.to_string(),
            token: token.clone(),
        })
    }

    fn set_preference(&mut self, host: &str, account: Option<&str>) -> Result<()> {
        let key = host.to_lowercase();
        match account {
            Some(name) => {
                self.preferences.insert(key, name.to_string());
            }
            None => {
                self.preferences.remove(&key);
            }
        }
        if let Some(cache) = &mut self.cache {
            cache.replace(AccountPreferences {
                preferred_accounts: self.preferences.clone(),
            })?;
        }
        Ok(())
    }
}

impl AccountProvider for ConfiguredAccounts {
    fn is_provider(&self, host: &str) -> bool {
        self.config.is_provider(host)
    }

    fn default_session(&mut self, host: &str) -> Result<Option<AccountSession>> {
        let preferred = self.preferences.get(&host.to_lowercase());
        let accounts = self.accounts_for(host);

        let chosen = preferred
            .and_then(|name| accounts.iter().find(|account| &account.name == name))
            .or_else(|| accounts.first());

        if let Some(session) = chosen.and_then(|account| Self::session_for(account)) {
            return Ok(Some(session));
        }
        Ok(self.env_session(host))
    }

    fn reselect_session(&mut self, host: &str) -> Result<Option<AccountSession>> {
        let previous = self.preferences.get(&host.to_lowercase()).cloned();
        self.set_preference(host, None)?;

        let candidates: Vec<AccountSession> = self
            .accounts_for(host)
            .into_iter()
            .filter_map(Self::session_for)
            .collect();

        let selected = match candidates.len() {
            0 => {
                debug!(host, "No configured accounts to re-select");
                return Ok(self.env_session(host));
            }
            1 => candidates.into_iter().next(),
            _ if self.interactive => {
                let names: Vec<String> = candidates.iter().map(|c| c.account.clone()).collect();
                let answer = inquire::Select::new(&format!("Select an account for {host}:"), names).prompt()?;
                candidates.into_iter().find(|c| c.account == answer)
            }
            _ => {
                // Non-interactive: move past the account that was preferred before
                let start = previous
                    .as_ref()
                    .and_then(|name| candidates.iter().position(|c| &c.account == name))
                    .map_or(0, |index| (index + 1) % candidates.len());
                candidates.into_iter().nth(start)
            }
        };

        if let Some(session) = &selected {
            if let Err(err) = self.set_preference(host, Some(&session.account)) {
                warn!(host, "Failed to persist account preference: {err}");
            }
        }
        Ok(selected)
    }
}
