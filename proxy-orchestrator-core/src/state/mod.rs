//! Durable record snapshots
//!
//! The state file maps account name → zone id → record id → [`Snapshot`].
//! [`StateStore`] is its only reader and writer.

mod snapshot;
mod store;

pub use snapshot::{AccountState, STATE_VERSION, Snapshot, SnapshotKey, StateDocument, ZoneState};
pub use store::{StateStore, ZoneKeys};
