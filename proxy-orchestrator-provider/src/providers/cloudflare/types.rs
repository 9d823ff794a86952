//! Cloudflare API 类型定义

use serde::{Deserialize, Serialize};

use crate::types::{DnsRecord, DnsRecordType, Page, RemoteAccount, TokenInfo, Zone};

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CloudflareError>>,
    pub result_info: Option<CloudflareResultInfo>,
}

impl<T> CloudflareResponse<T> {
    /// First reported error as `(code, message)`.
    pub fn first_error(&self) -> (String, String) {
        self.errors
            .as_ref()
            .and_then(|errors| {
                errors
                    .first()
                    .map(|e| (e.code.to_string(), e.message.clone()))
            })
            .unwrap_or_else(|| (String::new(), "Unknown error".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResultInfo {
    #[allow(dead_code)]
    pub page: Option<u32>,
    #[allow(dead_code)]
    pub per_page: Option<u32>,
    pub total_pages: Option<u32>,
}

/// List endpoints answer with an envelope; some proxies and older endpoints
/// return the bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CloudflareListBody<T> {
    Envelope(CloudflareResponse<Vec<T>>),
    Bare(Vec<T>),
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub account: Option<CloudflareZoneAccount>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareZoneAccount {
    pub id: String,
}

impl From<CloudflareZone> for Zone {
    fn from(zone: CloudflareZone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            account_id: zone.account.map(|a| a.id),
        }
    }
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl From<CloudflareDnsRecord> for DnsRecord {
    fn from(record: CloudflareDnsRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            record_type: DnsRecordType::from(record.record_type),
            content: record.content,
            proxied: record.proxied.unwrap_or(false),
            // Cloudflare reports a cleared comment as an empty string
            comment: record.comment.filter(|c| !c.is_empty()),
        }
    }
}

/// PATCH body for `/zones/{zone_id}/dns_records/{record_id}`
#[derive(Debug, Serialize)]
pub struct CloudflareRecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// An empty string clears the comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareTokenStatus {
    pub id: String,
    pub status: String,
}

impl From<CloudflareTokenStatus> for TokenInfo {
    fn from(token: CloudflareTokenStatus) -> Self {
        Self {
            id: token.id,
            status: token.status,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudflareAccount {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

impl From<CloudflareAccount> for RemoteAccount {
    fn from(account: CloudflareAccount) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
        }
    }
}

/// Convert a validated list body into a [`Page`].
pub fn into_page<T, U: From<T>>(items: Vec<T>, total_pages: Option<u32>, enveloped: bool) -> Page<U> {
    let items = items.into_iter().map(U::from).collect();
    if enveloped {
        Page::Envelope { items, total_pages }
    } else {
        Page::Bare(items)
    }
}
