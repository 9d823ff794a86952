//! # proxy-orchestrator-provider
//!
//! Cloudflare DNS API adapter used by the proxy orchestrator.
//!
//! The crate exposes one provider trait ([`DnsProvider`]), its Cloudflare
//! implementation, and [`RemoteClient`], which wraps any provider with
//! exponential-backoff retry and page collection.
//!
//! ## Feature Flags
//!
//! - **`rustls`** *(default)*: use rustls.
//! - **`native-tls`**: use the platform's native TLS implementation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use proxy_orchestrator_provider::{create_provider, ProviderCredentials, RemoteClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!     })?;
//!     let client = RemoteClient::new(provider);
//!
//!     for zone in client.list_all_zones(None).await? {
//!         let records = client.list_all_records(&zone.id).await?;
//!         let proxied = records.iter().filter(|r| r.proxied).count();
//!         println!("{}: {proxied}/{} proxied", zone.name, records.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`, and 5xx
//! `ServerError`s) are retried by [`RemoteClient`]; see
//! [`ProviderError::is_retryable`].

mod client;
mod error;
mod factory;
mod http_client;
mod pagination;
mod providers;
mod retry;
mod traits;
mod types;
mod utils;

pub use client::{
    ACCOUNT_PAGE_SIZE, MutationOutcome, RECORD_PAGE_SIZE, RemoteClient, ZONE_PAGE_SIZE,
};
pub use error::{ProviderError, Result};
pub use factory::create_provider;
pub use pagination::paginate;
pub use providers::CloudflareProvider;
pub use retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, RetryPolicy, Sleeper,
    TokioSleeper, call_with_retry,
};
pub use traits::DnsProvider;
pub use types::{
    DnsRecord, DnsRecordType, Page, PaginationParams, ProviderCredentials, RecordUpdate,
    RemoteAccount, TokenInfo, Zone,
};
