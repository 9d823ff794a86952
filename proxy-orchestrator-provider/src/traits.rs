use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    DnsRecord, Page, PaginationParams, RecordUpdate, RemoteAccount, TokenInfo, Zone,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录 ID（用于 `RecordNotFound`）
    pub record_id: Option<String>,
    /// Zone ID（用于 `DomainNotFound`）
    pub zone_id: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Remote DNS API.
///
/// Methods map one-to-one onto remote calls; retry and pagination are layered
/// on top by [`RemoteClient`](crate::RemoteClient).
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// Verify the token and return its status.
    async fn verify_token(&self) -> Result<TokenInfo>;

    /// Fetch one page of the remote accounts the token can access.
    async fn list_accounts(&self, params: &PaginationParams) -> Result<Page<RemoteAccount>>;

    /// Fetch one page of zones, optionally restricted to a remote account id.
    async fn list_zones(
        &self,
        account_id: Option<&str>,
        params: &PaginationParams,
    ) -> Result<Page<Zone>>;

    /// Fetch one page of records in a zone.
    async fn list_records(&self, zone_id: &str, params: &PaginationParams)
    -> Result<Page<DnsRecord>>;

    /// Fetch a single record.
    async fn get_record(&self, zone_id: &str, record_id: &str) -> Result<DnsRecord>;

    /// Apply `update` to a record and return the record as stored remotely.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<DnsRecord>;
}
