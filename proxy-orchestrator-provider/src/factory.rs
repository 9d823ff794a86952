//! Provider factory.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::CloudflareProvider;
use crate::traits::DnsProvider;
use crate::types::ProviderCredentials;

/// Creates a [`DnsProvider`] instance from the given credentials.
///
/// The returned provider is wrapped in `Arc<dyn DnsProvider>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use proxy_orchestrator_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Cloudflare {
///     api_token: "your-token".to_string(),
/// }).unwrap();
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn DnsProvider>> {
    match credentials {
        ProviderCredentials::Cloudflare { api_token } => {
            Ok(Arc::new(CloudflareProvider::new(api_token)?))
        }
    }
}
