//! Provider registry abstract Trait

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use proxy_orchestrator_provider::DnsProvider;

/// Provider Registry Trait
///
/// Manages all registered Provider instances, indexed by account name.
/// Provides a default memory implementation of `InMemoryProviderRegistry`.
#[async_trait]
pub trait ProviderRegistry: Send + Sync {
    /// Register a Provider instance
    ///
    /// # Arguments
    /// * `account` - Account name
    /// * `provider` - Provider instance
    async fn register(&self, account: String, provider: Arc<dyn DnsProvider>);

    /// Get Provider instance
    async fn get(&self, account: &str) -> Option<Arc<dyn DnsProvider>>;

    /// List all registered account names
    async fn list_accounts(&self) -> Vec<String>;
}

/// In-memory Provider registry
#[derive(Clone, Default)]
pub struct InMemoryProviderRegistry {
    providers: Arc<RwLock<HashMap<String, Arc<dyn DnsProvider>>>>,
}

impl InMemoryProviderRegistry {
    /// Create a new memory registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderRegistry for InMemoryProviderRegistry {
    async fn register(&self, account: String, provider: Arc<dyn DnsProvider>) {
        self.providers.write().await.insert(account, provider);
    }

    async fn get(&self, account: &str) -> Option<Arc<dyn DnsProvider>> {
        self.providers.read().await.get(account).cloned()
    }

    async fn list_accounts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
