//! Structured run events
//!
//! The engine reports progress and faults as [`RunEvent`]s. Rendering them
//! (console, log file, JSON) is up to the [`EventSink`] the caller injects.

use crate::types::{AccountStats, ChangeAction, ChangeRecord};

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Processing of an account begins.
    AccountStarted {
        account: String,
        account_id: Option<String>,
    },
    /// An account in the state file is not configured, or has no provider.
    AccountSkipped { account: String, reason: String },
    /// Records of a zone have been listed (disable) or read from state (restore).
    ZoneScanned {
        account: String,
        zone: String,
        zone_id: String,
        records: usize,
    },
    /// Listing zones or records failed; the scope is treated as empty.
    ScopeFailed {
        account: String,
        zone: Option<String>,
        zone_id: Option<String>,
        error: String,
    },
    /// A record was changed, or would be in a dry run.
    ProxyChanged(ChangeRecord),
    /// The remote record already had the target proxy state; nothing was written.
    AlreadyInState {
        account: String,
        zone: String,
        record_id: String,
        record_name: String,
        proxied: bool,
    },
    /// Changing one record failed.
    RecordFailed {
        account: String,
        zone: String,
        zone_id: String,
        record_id: String,
        record_name: String,
        action: ChangeAction,
        error: String,
    },
    StateSaved { account: String, path: String },
    StateSaveFailed { account: String, error: String },
    /// Processing of an account ended.
    AccountFinished { account: String, stats: AccountStats },
}

/// Receiver of [`RunEvent`]s.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: RunEvent);
}
