//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Authentication error
            // 6003: Invalid request headers
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("6003" | "6111" | "9109" | "10000") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 10001: Token lacks the permission for this endpoint
            Some("10001") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 9041: This DNS record cannot be proxied
            // 9300: Comment too long for the plan
            Some(code @ ("9041" | "9300")) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: if code == "9041" { "proxied" } else { "comment" }.to_string(),
                detail: raw.message,
            },

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: context.record_id.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 971: Please wait and consider throttling your request speed
            Some("971") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // 7000: No route for that URI
            // 7003: Could not route to /path. Perhaps your object identifier is invalid?
            Some("7000" | "7003") => match context.record_id {
                Some(record_id) => ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                None => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: context.zone_id.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            // Other error fallback
            _ => self.unknown_error(raw),
        }
    }
}
