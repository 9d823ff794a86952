//! Account configuration from environment variables
//!
//! `CLOUDFLARE_API_TOKEN_<NAME>` defines account `<name>` (lowercased);
//! `CLOUDFLARE_ACCOUNT_ID_<NAME>` optionally scopes it to one remote account.

use std::collections::HashMap;

use anyhow::{Result, bail};
use proxy_orchestrator_core::types::{Account, ProviderCredentials};

pub const TOKEN_PREFIX: &str = "CLOUDFLARE_API_TOKEN_";
pub const ACCOUNT_ID_PREFIX: &str = "CLOUDFLARE_ACCOUNT_ID_";

/// Accounts configured in the process environment.
pub fn accounts_from_env() -> Result<Vec<Account>> {
    accounts_from_vars(std::env::vars())
}

/// Accounts defined by `vars`, sorted by name.
pub fn accounts_from_vars<I>(vars: I) -> Result<Vec<Account>>
where
    I: IntoIterator<Item = (String, String)>,
{
    let vars: HashMap<String, String> = vars.into_iter().collect();

    let mut accounts: Vec<Account> = vars
        .iter()
        .filter_map(|(key, token)| {
            let suffix = key.strip_prefix(TOKEN_PREFIX)?;
            if suffix.is_empty() || token.trim().is_empty() {
                return None;
            }
            let name = suffix.to_lowercase();
            let mut account = Account::new(
                name.clone(),
                ProviderCredentials::Cloudflare {
                    api_token: token.trim().to_string(),
                },
            );

            match vars
                .get(&format!("{ACCOUNT_ID_PREFIX}{}", name.to_uppercase()))
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
            {
                Some(id) => {
                    tracing::info!(account = %name, account_id = %id, "Loaded account");
                    account = account.with_account_id(id);
                }
                None => tracing::warn!(
                    account = %name,
                    "Account has no account ID specified; all zones visible to the token will be processed"
                ),
            }
            Some(account)
        })
        .collect();

    if accounts.is_empty() {
        bail!("No Cloudflare API tokens found. Set {TOKEN_PREFIX}<NAME> environment variables.");
    }

    accounts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(accounts)
}
