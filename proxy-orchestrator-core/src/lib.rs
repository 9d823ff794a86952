//! Proxy Orchestrator Core Library
//!
//! Stateful reconciliation engine that turns the Cloudflare proxy flag off
//! for selected DNS records and later turns it back on:
//! - Filter engine ([`filter`])
//! - Durable snapshot store ([`state`])
//! - Disable / restore flows ([`ReconcileService`])
//! - State summary and credential checks ([`StatusService`], [`VerifyService`])
//!
//! The engine knows nothing about consoles or report formats. Progress is
//! reported through an injected [`EventSink`].

pub mod error;
pub mod filter;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use filter::{FilterTarget, RecordFilter, TagField};
pub use services::{ReconcileService, ServiceContext, StatusService, VerifyService};
pub use state::{Snapshot, SnapshotKey, StateStore};
pub use traits::{EventSink, InMemoryProviderRegistry, ProviderRegistry, RunEvent};
