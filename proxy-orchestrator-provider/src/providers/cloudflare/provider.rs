//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{DnsProvider, ErrorContext};
use crate::types::{DnsRecord, Page, PaginationParams, RecordUpdate, RemoteAccount, TokenInfo, Zone};
use crate::utils::redact::mask_secret;

use super::types::CloudflareRecordPatch;
use super::{
    CloudflareAccount, CloudflareDnsRecord, CloudflareProvider, CloudflareTokenStatus,
    CloudflareZone, MAX_PAGE_SIZE_ACCOUNTS, MAX_PAGE_SIZE_RECORDS, MAX_PAGE_SIZE_ZONES,
};

fn zone_context(zone_id: &str) -> ErrorContext {
    ErrorContext {
        record_id: None,
        zone_id: Some(zone_id.to_string()),
    }
}

fn record_context(zone_id: &str, record_id: &str) -> ErrorContext {
    ErrorContext {
        record_id: Some(record_id.to_string()),
        zone_id: Some(zone_id.to_string()),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn verify_token(&self) -> Result<TokenInfo> {
        log::debug!("[cloudflare] verifying token {}", mask_secret(&self.api_token));
        let status: CloudflareTokenStatus = self
            .get("/user/tokens/verify", ErrorContext::default())
            .await?;
        Ok(status.into())
    }

    async fn list_accounts(&self, params: &PaginationParams) -> Result<Page<RemoteAccount>> {
        self.get_page::<CloudflareAccount, _>(
            "/accounts",
            params,
            MAX_PAGE_SIZE_ACCOUNTS,
            "",
            ErrorContext::default(),
        )
        .await
    }

    async fn list_zones(
        &self,
        account_id: Option<&str>,
        params: &PaginationParams,
    ) -> Result<Page<Zone>> {
        let query = account_id
            .map(|id| format!("&account.id={}", urlencoding::encode(id)))
            .unwrap_or_default();
        self.get_page::<CloudflareZone, _>(
            "/zones",
            params,
            MAX_PAGE_SIZE_ZONES,
            &query,
            ErrorContext::default(),
        )
        .await
    }

    async fn list_records(
        &self,
        zone_id: &str,
        params: &PaginationParams,
    ) -> Result<Page<DnsRecord>> {
        self.get_page::<CloudflareDnsRecord, _>(
            &format!("/zones/{zone_id}/dns_records"),
            params,
            MAX_PAGE_SIZE_RECORDS,
            "",
            zone_context(zone_id),
        )
        .await
    }

    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord> {
        let record: CloudflareDnsRecord = self
            .get(
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                record_context(zone_id, record_id),
            )
            .await?;
        Ok(record.into())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord> {
        let body = CloudflareRecordPatch {
            proxied: update.proxied,
            comment: update
                .comment
                .clone()
                .map(Option::unwrap_or_default),
        };

        let record: CloudflareDnsRecord = self
            .patch(
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &body,
                record_context(zone_id, record_id),
            )
            .await?;
        Ok(record.into())
    }
}
