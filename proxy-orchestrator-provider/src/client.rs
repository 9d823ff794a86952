//! Retrying, paginating front for a [`DnsProvider`].
//!
//! Every remote call made by the reconciliation engine goes through
//! [`RemoteClient`], so backoff and page collection live in one place.

use std::sync::Arc;

use crate::error::Result;
use crate::pagination::paginate;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper, call_with_retry};
use crate::traits::DnsProvider;
use crate::types::{DnsRecord, RecordUpdate, RemoteAccount, TokenInfo, Zone};

/// Page size requested for account listings.
pub const ACCOUNT_PAGE_SIZE: u32 = 50;
/// Page size requested for zone listings.
pub const ZONE_PAGE_SIZE: u32 = 50;
/// Page size requested for record listings.
pub const RECORD_PAGE_SIZE: u32 = 1000;

/// Result of [`RemoteClient::set_proxy_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The record was patched; holds the record as returned by the API.
    Applied(DnsRecord),
    /// The record already had the requested state; nothing was sent.
    AlreadyInState(DnsRecord),
}

/// Provider wrapper adding retry and pagination.
#[derive(Clone)]
pub struct RemoteClient {
    provider: Arc<dyn DnsProvider>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RemoteClient {
    /// Client using the default [`RetryPolicy`] and real sleeps.
    pub fn new(provider: Arc<dyn DnsProvider>) -> Self {
        Self::with_retry(provider, RetryPolicy::default(), Arc::new(TokioSleeper))
    }

    pub fn with_retry(
        provider: Arc<dyn DnsProvider>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            provider,
            policy,
            sleeper,
        }
    }

    pub async fn verify_token(&self) -> Result<TokenInfo> {
        call_with_retry(&self.policy, self.sleeper.as_ref(), "verify token", || {
            self.provider.verify_token()
        })
        .await
    }

    /// All remote accounts the token can access.
    pub async fn list_accounts(&self) -> Result<Vec<RemoteAccount>> {
        paginate(ACCOUNT_PAGE_SIZE, |params| async move {
            call_with_retry(&self.policy, self.sleeper.as_ref(), "list accounts", || {
                self.provider.list_accounts(&params)
            })
            .await
        })
        .await
    }

    /// All zones visible to the token, optionally limited to one account.
    pub async fn list_all_zones(&self, account_id: Option<&str>) -> Result<Vec<Zone>> {
        paginate(ZONE_PAGE_SIZE, |params| async move {
            call_with_retry(&self.policy, self.sleeper.as_ref(), "list zones", || {
                self.provider.list_zones(account_id, &params)
            })
            .await
        })
        .await
    }

    /// All DNS records of a zone.
    pub async fn list_all_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        paginate(RECORD_PAGE_SIZE, |params| async move {
            call_with_retry(&self.policy, self.sleeper.as_ref(), "list records", || {
                self.provider.list_records(zone_id, &params)
            })
            .await
        })
        .await
    }

    pub async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        call_with_retry(&self.policy, self.sleeper.as_ref(), "get record", || {
            self.provider.get_record(zone_id, record_id)
        })
        .await
    }

    pub async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        call_with_retry(&self.policy, self.sleeper.as_ref(), "update record", || {
            self.provider.update_record(zone_id, record_id, update)
        })
        .await
    }

    /// Set the proxy flag (and optionally the comment) of one record.
    ///
    /// The record is read first; when it already matches the requested
    /// state no PATCH is sent.
    pub async fn set_proxy_state(
        &self,
        zone_id: &str,
        record_id: &str,
        proxied: bool,
        comment: Option<Option<String>>,
    ) -> Result<MutationOutcome> {
        let current = self.get_record(zone_id, record_id).await?;

        let mut update = RecordUpdate::proxied(proxied);
        if let Some(comment) = comment {
            update = update.with_comment(comment);
        }

        if !update.changes(&current) {
            log::debug!("record {record_id} in zone {zone_id} already in requested state");
            return Ok(MutationOutcome::AlreadyInState(current));
        }

        let updated = self.update_record(zone_id, record_id, &update).await?;
        Ok(MutationOutcome::Applied(updated))
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("provider", &self.provider.id())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
