//! 业务逻辑服务层

mod reconcile_service;
mod status_service;
mod verify_service;

pub use reconcile_service::ReconcileService;
pub use status_service::{AccountSummary, RecordSummary, StateSummary, StatusService, ZoneSummary};
pub use verify_service::{AccountVerification, VerifyService};

use std::collections::BTreeMap;
use std::sync::Arc;

use proxy_orchestrator_provider::{
    RemoteClient, RetryPolicy, Sleeper, TokioSleeper, create_provider,
};

use crate::error::{CoreError, CoreResult};
use crate::traits::{EventSink, InMemoryProviderRegistry, ProviderRegistry, RunEvent};
use crate::types::Account;

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入 Provider 注册表和事件接收器。
pub struct ServiceContext {
    /// 已配置账户（按名称排序）
    pub accounts: BTreeMap<String, Account>,
    /// Provider 注册表
    pub provider_registry: Arc<dyn ProviderRegistry>,
    /// 事件接收器
    pub events: Arc<dyn EventSink>,
    /// 远端调用重试策略
    pub retry_policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        accounts: impl IntoIterator<Item = Account>,
        provider_registry: Arc<dyn ProviderRegistry>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|a| (a.name.clone(), a))
                .collect(),
            provider_registry,
            events,
            retry_policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the retry policy and the sleeper used between attempts.
    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        self.retry_policy = policy;
        self.sleeper = sleeper;
        self
    }

    /// Create a provider for every account and register it.
    pub async fn bootstrap(
        accounts: Vec<Account>,
        events: Arc<dyn EventSink>,
    ) -> CoreResult<Self> {
        let registry = Arc::new(InMemoryProviderRegistry::new());
        for account in &accounts {
            let provider = create_provider(account.credentials.clone())?;
            registry.register(account.name.clone(), provider).await;
            log::debug!("Registered provider for account {}", account.name);
        }
        Ok(Self::new(accounts, registry, events))
    }

    pub fn account(&self, name: &str) -> CoreResult<&Account> {
        self.accounts
            .get(name)
            .ok_or_else(|| CoreError::AccountNotFound(name.to_string()))
    }

    /// 获取账户的远端客户端（带重试）
    pub async fn client(&self, account: &str) -> CoreResult<RemoteClient> {
        let provider = self
            .provider_registry
            .get(account)
            .await
            .ok_or_else(|| CoreError::AccountNotFound(account.to_string()))?;
        Ok(RemoteClient::with_retry(
            provider,
            self.retry_policy,
            Arc::clone(&self.sleeper),
        ))
    }

    pub fn emit(&self, event: RunEvent) {
        self.events.emit(event);
    }
}
