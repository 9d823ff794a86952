use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP statuses that indicate a transient fault worth retrying.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Lowercase fragments that mark an otherwise unclassified error as transient.
const RETRYABLE_MESSAGE_FRAGMENTS: [&str; 6] = [
    "rate limit",
    "too many requests",
    "timeout",
    "timed out",
    "connection",
    "temporarily unavailable",
];

/// Unified error type for all remote DNS API operations.
///
/// Each variant includes a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// [`is_retryable`](Self::is_retryable) classifies transient failures:
/// - [`NetworkError`](Self::NetworkError) and [`Timeout`](Self::Timeout)
/// - [`RateLimited`](Self::RateLimited) (HTTP 429)
/// - [`ServerError`](Self::ServerError) with status 500, 502, 503 or 504
/// - [`Unknown`](Self::Unknown) whose message mentions a rate limit, timeout or connection problem
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        provider: String,
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        provider: String,
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    /// The remote service answered with a 5xx status.
    ServerError {
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Response body or error details.
        detail: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// The token lacks permission for the requested operation.
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    RecordNotFound {
        provider: String,
        /// ID of the record that was not found.
        record_id: String,
        raw_message: Option<String>,
    },

    /// The specified zone was not found.
    DomainNotFound {
        provider: String,
        /// Zone id or name that was not found.
        domain: String,
        raw_message: Option<String>,
    },

    /// A request parameter was rejected (e.g. a record that cannot be proxied).
    InvalidParameter {
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    Unknown {
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// Whether the failure is transient and the call may succeed when repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::ServerError { status, .. } => RETRYABLE_STATUSES.contains(status),
            Self::Unknown { raw_message, .. } => message_looks_transient(raw_message),
            _ => false,
        }
    }

    /// 是否为预期行为（凭证、权限、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::RecordNotFound { .. }
                | Self::DomainNotFound { .. }
                | Self::InvalidParameter { .. }
        )
    }

    /// Server-suggested delay, when the API sent a `Retry-After` header.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

fn message_looks_transient(message: &str) -> bool {
    let lowered = message.to_lowercase();
    RETRYABLE_MESSAGE_FRAGMENTS
        .iter()
        .any(|fragment| lowered.contains(fragment))
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::RateLimited {
                provider,
                retry_after: Some(secs),
                ..
            } => write!(f, "[{provider}] Rate limited (retry after {secs}s)"),
            Self::RateLimited { provider, .. } => write!(f, "[{provider}] Rate limited"),
            Self::ServerError {
                provider,
                status,
                detail,
            } => write!(f, "[{provider}] Server error (HTTP {status}): {detail}"),
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => with_detail(f, provider, "Invalid credentials", raw_message.as_deref()),
            Self::PermissionDenied {
                provider,
                raw_message,
            } => with_detail(f, provider, "Permission denied", raw_message.as_deref()),
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => write!(f, "[{provider}] Record '{record_id}' not found"),
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => with_detail(
                f,
                provider,
                &format!("Zone '{domain}' not found"),
                raw_message.as_deref(),
            ),
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => write!(f, "[{provider}] Invalid parameter '{param}': {detail}"),
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => write!(f, "[{provider}] {raw_message}"),
        }
    }
}

fn with_detail(
    f: &mut fmt::Formatter<'_>,
    provider: &str,
    what: &str,
    detail: Option<&str>,
) -> fmt::Result {
    match detail {
        Some(detail) => write!(f, "[{provider}] {what}: {detail}"),
        None => write!(f, "[{provider}] {what}"),
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
