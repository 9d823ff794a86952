//! 账户相关类型定义

use std::fmt;

use proxy_orchestrator_provider::ProviderCredentials;

/// 已配置的账户
///
/// Loaded once at startup and immutable afterwards. `name` is the key used in
/// the state file; `account_id` scopes zone listing to one remote account.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    /// 账户名称（小写）
    pub name: String,
    /// 凭证
    pub credentials: ProviderCredentials,
    /// 远端账户 ID（可选）
    pub account_id: Option<String>,
}

impl Account {
    #[must_use]
    pub fn new(name: impl Into<String>, credentials: ProviderCredentials) -> Self {
        Self {
            name: name.into(),
            credentials,
            account_id: None,
        }
    }

    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }
}

// Credentials never reach logs.
impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("name", &self.name)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}
