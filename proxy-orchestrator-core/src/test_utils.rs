//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proxy_orchestrator_provider::{
    DnsProvider, DnsRecord, DnsRecordType, Page, PaginationParams, ProviderCredentials,
    ProviderError, RecordUpdate, RemoteAccount, Result, RetryPolicy, TokenInfo, TokioSleeper,
    Zone,
};

use crate::services::ServiceContext;
use crate::traits::{EventSink, InMemoryProviderRegistry, ProviderRegistry, RunEvent};
use crate::types::Account;

// ===== MockProvider =====

/// Scripted in-memory provider.
///
/// Updates are applied to the stored records, so a later listing sees them.
#[derive(Default)]
pub struct MockProvider {
    zones: Mutex<Vec<Zone>>,
    records: Mutex<HashMap<String, Vec<DnsRecord>>>,
    remote_accounts: Mutex<Vec<RemoteAccount>>,
    fail_zone_listing: AtomicBool,
    fail_token: AtomicBool,
    failing_record_lists: Mutex<HashSet<String>>,
    failing_updates: Mutex<HashSet<String>>,
    update_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(self, id: &str, name: &str) -> Self {
        self.zones.lock().unwrap().push(Zone {
            id: id.to_string(),
            name: name.to_string(),
            account_id: None,
        });
        self
    }

    pub fn with_record(self, zone_id: &str, record: DnsRecord) -> Self {
        self.records
            .lock()
            .unwrap()
            .entry(zone_id.to_string())
            .or_default()
            .push(record);
        self
    }

    pub fn with_remote_account(self, id: &str, name: &str) -> Self {
        self.remote_accounts.lock().unwrap().push(RemoteAccount {
            id: id.to_string(),
            name: name.to_string(),
            account_type: Some("standard".to_string()),
        });
        self
    }

    pub fn fail_zone_listing(&self) {
        self.fail_zone_listing.store(true, Ordering::SeqCst);
    }

    pub fn fail_token(&self) {
        self.fail_token.store(true, Ordering::SeqCst);
    }

    pub fn fail_record_listing(&self, zone_id: &str) {
        self.failing_record_lists
            .lock()
            .unwrap()
            .insert(zone_id.to_string());
    }

    pub fn fail_updates_for(&self, record_id: &str) {
        self.failing_updates
            .lock()
            .unwrap()
            .insert(record_id.to_string());
    }

    pub fn record(&self, zone_id: &str, record_id: &str) -> Option<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .get(zone_id)?
            .iter()
            .find(|r| r.id == record_id)
            .cloned()
    }

    /// Change a record behind the engine's back.
    pub fn set_proxied(&self, zone_id: &str, record_id: &str, proxied: bool) {
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records
            .get_mut(zone_id)
            .and_then(|rs| rs.iter_mut().find(|r| r.id == record_id))
        {
            r.proxied = proxied;
        }
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn not_found(record_id: &str) -> ProviderError {
        ProviderError::RecordNotFound {
            provider: "mock".to_string(),
            record_id: record_id.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn verify_token(&self) -> Result<TokenInfo> {
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(ProviderError::InvalidCredentials {
                provider: "mock".to_string(),
                raw_message: Some("Invalid API Token".to_string()),
            });
        }
        Ok(TokenInfo {
            id: "token-1".to_string(),
            status: "active".to_string(),
        })
    }

    async fn list_accounts(&self, _params: &PaginationParams) -> Result<Page<RemoteAccount>> {
        Ok(Page::Bare(self.remote_accounts.lock().unwrap().clone()))
    }

    async fn list_zones(
        &self,
        account_id: Option<&str>,
        _params: &PaginationParams,
    ) -> Result<Page<Zone>> {
        if self.fail_zone_listing.load(Ordering::SeqCst) {
            return Err(ProviderError::PermissionDenied {
                provider: "mock".to_string(),
                raw_message: Some("zone listing denied".to_string()),
            });
        }
        let items = self
            .zones
            .lock()
            .unwrap()
            .iter()
            .filter(|z| match (account_id, z.account_id.as_deref()) {
                (Some(wanted), Some(owner)) => wanted == owner,
                _ => true,
            })
            .cloned()
            .collect();
        Ok(Page::Envelope {
            items,
            total_pages: Some(1),
        })
    }

    async fn list_records(
        &self,
        zone_id: &str,
        _params: &PaginationParams,
    ) -> Result<Page<DnsRecord>> {
        if self.failing_record_lists.lock().unwrap().contains(zone_id) {
            return Err(ProviderError::DomainNotFound {
                provider: "mock".to_string(),
                domain: zone_id.to_string(),
                raw_message: None,
            });
        }
        let items = self
            .records
            .lock()
            .unwrap()
            .get(zone_id)
            .cloned()
            .unwrap_or_default();
        Ok(Page::Bare(items))
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.record(zone_id, record_id)
            .ok_or_else(|| Self::not_found(record_id))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_updates.lock().unwrap().contains(record_id) {
            return Err(ProviderError::InvalidParameter {
                provider: "mock".to_string(),
                param: "proxied".to_string(),
                detail: "This DNS record cannot be proxied.".to_string(),
            });
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(zone_id)
            .and_then(|rs| rs.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| Self::not_found(record_id))?;
        if let Some(proxied) = update.proxied {
            record.proxied = proxied;
        }
        if let Some(comment) = &update.comment {
            record.comment.clone_from(comment);
        }
        Ok(record.clone())
    }
}

// ===== RecordingSink =====

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: RunEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ===== Factories =====

pub fn record(id: &str, name: &str, record_type: DnsRecordType, proxied: bool) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type,
        content: "192.0.2.10".to_string(),
        proxied,
        comment: None,
    }
}

pub fn a_record(id: &str, name: &str, proxied: bool) -> DnsRecord {
    record(id, name, DnsRecordType::A, proxied)
}

pub fn test_account(name: &str) -> Account {
    Account::new(
        name,
        ProviderCredentials::Cloudflare {
            api_token: format!("token-{name}"),
        },
    )
}

/// Context over mock providers; retries disabled so failures surface at once.
pub async fn context_with(
    providers: Vec<(Account, Arc<MockProvider>)>,
    sink: Arc<RecordingSink>,
) -> Arc<ServiceContext> {
    let registry = Arc::new(InMemoryProviderRegistry::new());
    let mut accounts = Vec::new();
    for (account, provider) in providers {
        registry.register(account.name.clone(), provider).await;
        accounts.push(account);
    }
    Arc::new(
        ServiceContext::new(accounts, registry, sink)
            .with_retry(RetryPolicy::no_retry(), Arc::new(TokioSleeper)),
    )
}
