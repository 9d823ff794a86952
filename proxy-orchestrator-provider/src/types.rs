use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 100,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }

    /// Parameters for the page after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            page_size: self.page_size,
        }
    }
}

/// One page of a list response, as validated at the adapter boundary.
///
/// Remote list endpoints answer either with an envelope that carries paging
/// metadata, or with a bare array. Both shapes are supported by
/// [`paginate`](crate::paginate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<T> {
    /// Envelope response (`result` + `result_info.total_pages`).
    Envelope {
        /// Items on this page.
        items: Vec<T>,
        /// Total number of pages, if the API reported it.
        total_pages: Option<u32>,
    },
    /// Plain array response; a short page marks the end.
    Bare(Vec<T>),
}

impl<T> Page<T> {
    /// Items on this page.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Envelope { items, .. } | Self::Bare(items) => items,
        }
    }

    /// Consume the page, returning its items.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Envelope { items, .. } | Self::Bare(items) => items,
        }
    }
}

// ============ Credentials ============

/// Credentials for a remote DNS provider account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Cloudflare API token (Bearer auth).
    #[serde(rename = "cloudflare")]
    Cloudflare {
        /// API token.
        api_token: String,
    },
}

// ============ Zone Types ============

/// A zone (domain) visible to a provider token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-specific zone identifier.
    pub id: String,
    /// Zone name (e.g., `"example.com"`).
    pub name: String,
    /// Remote account id owning the zone, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

// ============ Record Types ============

/// DNS record type.
///
/// Only [`A`](Self::A), [`Aaaa`](Self::Aaaa) and [`Cname`](Self::Cname) can
/// carry the proxy flag; every other type is kept as [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name record.
    Cname,
    /// Any other record type, with its upper-case name.
    Other(String),
}

impl DnsRecordType {
    /// Whether the proxy flag of this record type can be toggled.
    #[must_use]
    pub fn is_proxiable(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }

    /// Upper-case wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for DnsRecordType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for DnsRecordType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DnsRecordType> for String {
    fn from(value: DnsRecordType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-specific record identifier.
    pub id: String,
    /// Fully-qualified record name.
    pub name: String,
    /// Record type.
    pub record_type: DnsRecordType,
    /// Record content (address or target).
    pub content: String,
    /// Whether traffic is routed through the edge proxy.
    pub proxied: bool,
    /// Free-text comment attached to the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Fields changed by a record update.
///
/// `comment`:
/// - `None` leaves the comment untouched
/// - `Some(None)` clears it
/// - `Some(Some(text))` replaces it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New proxy flag.
    pub proxied: Option<bool>,
    /// New comment.
    pub comment: Option<Option<String>>,
}

impl RecordUpdate {
    /// Update that only sets the proxy flag.
    #[must_use]
    pub fn proxied(proxied: bool) -> Self {
        Self {
            proxied: Some(proxied),
            comment: None,
        }
    }

    /// Also replace (or clear) the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Whether applying this update to `record` would change anything.
    #[must_use]
    pub fn changes(&self, record: &DnsRecord) -> bool {
        let proxy_change = self.proxied.is_some_and(|p| p != record.proxied);
        let comment_change = self.comment.as_ref().is_some_and(|c| *c != record.comment);
        proxy_change || comment_change
    }
}

// ============ Token Types ============

/// Result of a token verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token identifier.
    pub id: String,
    /// Token status (e.g., `"active"`).
    pub status: String,
}

impl TokenInfo {
    /// Whether the token can be used.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// A remote account reachable with a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAccount {
    /// Remote account id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Account type (e.g., `"standard"`, `"enterprise"`).
    pub account_type: Option<String>,
}
