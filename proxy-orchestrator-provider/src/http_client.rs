//! Request execution shared by provider implementations
//!
//! Sends a prepared request, logs the exchange, and turns transport failures
//! and transient HTTP statuses into classified [`ProviderError`]s. Other
//! statuses are handed back with their body for the provider to interpret.
//! Retrying lives in [`crate::retry`].

use reqwest::RequestBuilder;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::error::{ProviderError, Result};
use crate::utils::redact::truncate_for_log;

/// Status and body of a completed exchange.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

pub(crate) async fn send(
    provider: &str,
    method: &str,
    url: &str,
    request: RequestBuilder,
) -> Result<RawResponse> {
    log::debug!("[{provider}] {method} {url}");

    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, &e))?;
    let status = response.status().as_u16();
    let retry_after = retry_after_secs(response.headers());

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("failed to read response body: {e}"),
        })?;
    log::debug!("[{provider}] HTTP {status}: {}", truncate_for_log(&body));

    if let Some(err) = transient_status(provider, status, retry_after, &body) {
        return Err(err);
    }
    Ok(RawResponse { status, body })
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

/// `Retry-After` in seconds; the HTTP-date form is ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// 429 and 5xx, which are retried without looking at the body.
fn transient_status(
    provider: &str,
    status: u16,
    retry_after: Option<u64>,
    body: &str,
) -> Option<ProviderError> {
    match status {
        429 => {
            log::warn!("[{provider}] rate limited (HTTP 429), retry_after={retry_after:?}");
            Some(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(body)),
            })
        }
        500..=599 => {
            log::warn!("[{provider}] server error (HTTP {status})");
            Some(ProviderError::ServerError {
                provider: provider.to_string(),
                status,
                detail: truncate_for_log(body),
            })
        }
        _ => None,
    }
}
