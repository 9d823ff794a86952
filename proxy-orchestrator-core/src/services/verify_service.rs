//! 账户凭证校验服务

use std::sync::Arc;

use serde::Serialize;

use crate::services::ServiceContext;
use crate::types::{Account, RemoteAccount};

/// Result of checking one configured account.
///
/// Failures are carried in `error` so that one bad account never hides the
/// others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountVerification {
    pub account: String,
    pub token_id: Option<String>,
    pub token_status: Option<String>,
    pub accessible_accounts: Vec<RemoteAccount>,
    pub configured_account_id: Option<String>,
    /// `None` when no account id is configured.
    pub account_id_valid: Option<bool>,
    pub error: Option<String>,
}

impl AccountVerification {
    fn new(account: &Account) -> Self {
        Self {
            account: account.name.clone(),
            token_id: None,
            token_status: None,
            accessible_accounts: Vec::new(),
            configured_account_id: account.account_id.clone(),
            account_id_valid: None,
            error: None,
        }
    }

    /// Token active and configured account id (if any) reachable.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
            && self.token_status.as_deref() == Some("active")
            && self.account_id_valid != Some(false)
    }
}

/// 账户校验服务
pub struct VerifyService {
    ctx: Arc<ServiceContext>,
}

impl VerifyService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Verify every configured account, in name order.
    pub async fn verify_all(&self) -> Vec<AccountVerification> {
        let mut results = Vec::with_capacity(self.ctx.accounts.len());
        for name in self.ctx.accounts.keys() {
            results.push(self.verify_account(name).await);
        }
        results
    }

    /// Verify the token of `name` and the scope id configured for it.
    pub async fn verify_account(&self, name: &str) -> AccountVerification {
        let account = match self.ctx.account(name) {
            Ok(account) => account,
            Err(e) => {
                return AccountVerification {
                    account: name.to_string(),
                    token_id: None,
                    token_status: None,
                    accessible_accounts: Vec::new(),
                    configured_account_id: None,
                    account_id_valid: None,
                    error: Some(e.to_string()),
                };
            }
        };
        let mut verification = AccountVerification::new(account);

        let client = match self.ctx.client(name).await {
            Ok(client) => client,
            Err(e) => {
                verification.error = Some(e.to_string());
                return verification;
            }
        };

        match client.verify_token().await {
            Ok(token) => {
                verification.token_id = Some(token.id);
                verification.token_status = Some(token.status);
            }
            Err(e) => {
                log::warn!("Token verification failed for account {name}: {e}");
                verification.error = Some(e.to_string());
                return verification;
            }
        }

        match client.list_accounts().await {
            Ok(accounts) => {
                verification.account_id_valid = account
                    .account_id
                    .as_deref()
                    .map(|id| accounts.iter().any(|a| a.id == id));
                verification.accessible_accounts = accounts;
            }
            Err(e) => {
                log::warn!("Listing accounts failed for account {name}: {e}");
                verification.error = Some(e.to_string());
            }
        }

        verification
    }
}
