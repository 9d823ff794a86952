//! Injection points of the engine

mod event_sink;
mod provider_registry;

pub use event_sink::{EventSink, RunEvent};
pub use provider_registry::{InMemoryProviderRegistry, ProviderRegistry};
