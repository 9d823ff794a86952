//! Renders engine events as `tracing` events.

use proxy_orchestrator_core::traits::{EventSink, RunEvent};
use proxy_orchestrator_core::types::ChangeAction;
use tracing::{debug, error, info, warn};

const NA: &str = "N/A";

/// [`EventSink`] writing every [`RunEvent`] to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: RunEvent) {
        match event {
            RunEvent::AccountStarted {
                account,
                account_id,
            } => info!(
                account = %account,
                account_id = account_id.as_deref().unwrap_or(NA),
                "Processing account"
            ),
            RunEvent::AccountSkipped { account, reason } => {
                warn!(account = %account, "Skipping account: {reason}");
            }
            RunEvent::ZoneScanned {
                account,
                zone,
                zone_id,
                records,
            } => info!(
                account = %account,
                zone = %zone,
                zone_id = %zone_id,
                records,
                "Processing zone"
            ),
            RunEvent::ScopeFailed {
                account,
                zone,
                zone_id,
                error,
            } => error!(
                account = %account,
                zone = zone.as_deref().unwrap_or(NA),
                zone_id = zone_id.as_deref().unwrap_or(NA),
                "Listing failed: {error}"
            ),
            RunEvent::ProxyChanged(change) => {
                let verb = match change.action.live() {
                    ChangeAction::Disable => "disable",
                    _ => "restore",
                };
                let prefix = if change.action.is_dry_run() {
                    "[DRY RUN] Would "
                } else {
                    ""
                };
                info!(
                    account = %change.account,
                    account_id = change.account_id.as_deref().unwrap_or(NA),
                    zone = %change.zone,
                    zone_id = %change.zone_id,
                    record_name = %change.record_name,
                    record_type = %change.record_type,
                    action = %change.action,
                    comment_changed = change.comment_changed(),
                    "{prefix}{verb} proxy for {}",
                    change.record_name
                );
            }
            RunEvent::AlreadyInState {
                account,
                zone,
                record_id,
                record_name,
                proxied,
            } => debug!(
                account = %account,
                zone = %zone,
                record_id = %record_id,
                record_name = %record_name,
                proxied,
                "Record already in requested state"
            ),
            RunEvent::RecordFailed {
                account,
                zone,
                zone_id,
                record_id,
                record_name,
                action,
                error,
            } => error!(
                account = %account,
                zone = %zone,
                zone_id = %zone_id,
                record_id = %record_id,
                record_name = %record_name,
                action = %action,
                "Failed to update record: {error}"
            ),
            RunEvent::StateSaved { account, path } => {
                debug!(account = %account, path = %path, "State saved");
            }
            RunEvent::StateSaveFailed { account, error } => {
                error!(account = %account, "Failed to save state: {error}");
            }
            RunEvent::AccountFinished { account, stats } => info!(
                account = %account,
                zones = stats.zones_processed,
                records = stats.records_processed,
                modified = stats.records_modified,
                errors = stats.errors,
                "Account finished"
            ),
        }
    }
}
