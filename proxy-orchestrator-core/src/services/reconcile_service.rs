//! 代理状态调和服务 (disable / restore)
//!
//! Accounts, zones and records are processed strictly in sequence. State is
//! saved once per account, after all of its zones; dry runs never save.

use std::sync::Arc;

use chrono::Utc;
use proxy_orchestrator_provider::{MutationOutcome, RemoteClient};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::state::{SnapshotKey, StateStore};
use crate::traits::RunEvent;
use crate::types::{
    Account, ChangeAction, ChangeRecord, DisableOptions, DnsRecord, RestoreOptions, RunResult,
    Zone,
};
use crate::utils::TemplateContext;

/// 代理状态调和服务
pub struct ReconcileService {
    ctx: Arc<ServiceContext>,
}

impl ReconcileService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== Disable =====

    /// Turn the proxy off for every matching, currently proxied record.
    ///
    /// Each record is snapshotted on first sight. A record whose snapshot is
    /// already `modified` is left alone, so repeated runs are no-ops.
    pub async fn disable(&self, store: &mut StateStore, options: &DisableOptions) -> RunResult {
        let mut result = RunResult::new(options.dry_run);

        for account in self.ctx.accounts.values() {
            if !options.scope.includes_account(&account.name) {
                continue;
            }
            self.disable_account(account, store, options, &mut result)
                .await;
        }

        result
    }

    async fn disable_account(
        &self,
        account: &Account,
        store: &mut StateStore,
        options: &DisableOptions,
        result: &mut RunResult,
    ) {
        self.ctx.emit(RunEvent::AccountStarted {
            account: account.name.clone(),
            account_id: account.account_id.clone(),
        });
        result.stats_mut(&account.name);

        let client = match self.ctx.client(&account.name).await {
            Ok(client) => client,
            Err(e) => {
                self.skip_account(account, &e, result);
                return;
            }
        };

        let zones = match client.list_all_zones(account.account_id.as_deref()).await {
            Ok(zones) => zones,
            Err(e) => {
                result.stats_mut(&account.name).errors += 1;
                self.ctx.emit(RunEvent::ScopeFailed {
                    account: account.name.clone(),
                    zone: None,
                    zone_id: None,
                    error: e.to_string(),
                });
                Vec::new()
            }
        };

        for zone in zones
            .iter()
            .filter(|z| options.scope.includes_zone(&z.name, &z.id))
        {
            self.disable_zone(&client, account, zone, store, options, result)
                .await;
        }

        self.checkpoint(&account.name, store, options.dry_run, result);
        self.finish_account(&account.name, result);
    }

    async fn disable_zone(
        &self,
        client: &RemoteClient,
        account: &Account,
        zone: &Zone,
        store: &mut StateStore,
        options: &DisableOptions,
        result: &mut RunResult,
    ) {
        result.stats_mut(&account.name).zones_processed += 1;
        store.ensure_zone(&account.name, &zone.id, &zone.name);

        let records = match client.list_all_records(&zone.id).await {
            Ok(records) => records,
            Err(e) => {
                result.stats_mut(&account.name).errors += 1;
                self.ctx.emit(RunEvent::ScopeFailed {
                    account: account.name.clone(),
                    zone: Some(zone.name.clone()),
                    zone_id: Some(zone.id.clone()),
                    error: e.to_string(),
                });
                Vec::new()
            }
        };

        self.ctx.emit(RunEvent::ZoneScanned {
            account: account.name.clone(),
            zone: zone.name.clone(),
            zone_id: zone.id.clone(),
            records: records.len(),
        });

        for record in records
            .iter()
            .filter(|r| r.record_type.is_proxiable() && options.filter.matches(*r))
        {
            self.disable_record(client, account, zone, record, store, options, result)
                .await;
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn disable_record(
        &self,
        client: &RemoteClient,
        account: &Account,
        zone: &Zone,
        record: &DnsRecord,
        store: &mut StateStore,
        options: &DisableOptions,
        result: &mut RunResult,
    ) {
        result.stats_mut(&account.name).records_processed += 1;

        let key = SnapshotKey::new(&account.name, &zone.id, &record.id);
        let snapshot = store.get_or_create_snapshot(&key, &zone.name, record);
        if !record.proxied || snapshot.modified {
            return;
        }

        let timestamp = Utc::now();
        let comment_override = options
            .comment_template
            .as_ref()
            .map(|template| {
                template.render(&TemplateContext {
                    timestamp,
                    account: &account.name,
                    account_id: account.account_id.as_deref(),
                    zone: &zone.name,
                    zone_id: &zone.id,
                    record_name: &record.name,
                    record_id: &record.id,
                })
            })
            .filter(|rendered| snapshot.comment.as_deref() != Some(rendered.as_str()));

        let change = ChangeRecord {
            action: ChangeAction::disable(options.dry_run),
            account: account.name.clone(),
            account_id: account.account_id.clone(),
            zone: zone.name.clone(),
            zone_id: zone.id.clone(),
            record_id: record.id.clone(),
            record_name: record.name.clone(),
            record_type: record.record_type.to_string(),
            content: record.content.clone(),
            proxied_before: true,
            proxied_after: false,
            comment_before: record.comment.clone(),
            comment_after: comment_override.clone().or_else(|| record.comment.clone()),
            timestamp,
        };

        if options.dry_run {
            self.apply_change(&account.name, change, result);
            return;
        }

        let outcome = client
            .set_proxy_state(&zone.id, &record.id, false, comment_override.clone().map(Some))
            .await;
        match outcome {
            Ok(MutationOutcome::Applied(_)) => {
                store.mark_modified(&key);
                if let Some(comment) = comment_override {
                    store.set_comment_override(&key, Some(comment));
                }
                self.apply_change(&account.name, change, result);
            }
            Ok(MutationOutcome::AlreadyInState(current)) => {
                self.ctx.emit(RunEvent::AlreadyInState {
                    account: account.name.clone(),
                    zone: zone.name.clone(),
                    record_id: record.id.clone(),
                    record_name: record.name.clone(),
                    proxied: current.proxied,
                });
            }
            Err(e) => self.record_failed(&change, &e.to_string(), result),
        }
    }

    // ===== Restore =====

    /// Turn the proxy back on for every record a disable run turned off.
    ///
    /// Works from the saved state only; no zone or record listing happens.
    /// Fails with [`CoreError::NoSavedState`] when there is no state file.
    pub async fn restore(
        &self,
        store: &mut StateStore,
        options: &RestoreOptions,
    ) -> CoreResult<RunResult> {
        if !store.exists() {
            return Err(CoreError::NoSavedState(store.path().display().to_string()));
        }

        let mut result = RunResult::new(options.dry_run);
        let state_accounts: Vec<String> = store.account_names().map(String::from).collect();

        for name in state_accounts {
            if !options.scope.includes_account(&name) {
                continue;
            }
            let Some(account) = self.ctx.accounts.get(&name) else {
                self.ctx.emit(RunEvent::AccountSkipped {
                    account: name,
                    reason: "present in state but not configured".to_string(),
                });
                continue;
            };
            self.restore_account(account, store, options, &mut result)
                .await;
        }

        Ok(result)
    }

    async fn restore_account(
        &self,
        account: &Account,
        store: &mut StateStore,
        options: &RestoreOptions,
        result: &mut RunResult,
    ) {
        self.ctx.emit(RunEvent::AccountStarted {
            account: account.name.clone(),
            account_id: account.account_id.clone(),
        });
        result.stats_mut(&account.name);

        let client = match self.ctx.client(&account.name).await {
            Ok(client) => client,
            Err(e) => {
                self.skip_account(account, &e, result);
                return;
            }
        };

        for zone in store.zones_for_account(&account.name) {
            if !options.scope.includes_zone(&zone.zone_name, &zone.zone_id) {
                continue;
            }

            result.stats_mut(&account.name).zones_processed += 1;
            self.ctx.emit(RunEvent::ZoneScanned {
                account: account.name.clone(),
                zone: zone.zone_name.clone(),
                zone_id: zone.zone_id.clone(),
                records: zone.keys.len(),
            });

            for key in &zone.keys {
                self.restore_record(&client, account, &zone.zone_name, key, store, options, result)
                    .await;
            }
        }

        self.checkpoint(&account.name, store, options.dry_run, result);
        self.finish_account(&account.name, result);
    }

    #[allow(clippy::too_many_arguments)]
    async fn restore_record(
        &self,
        client: &RemoteClient,
        account: &Account,
        zone_name: &str,
        key: &SnapshotKey,
        store: &mut StateStore,
        options: &RestoreOptions,
        result: &mut RunResult,
    ) {
        let Some(snapshot) = store.snapshot(key).cloned() else {
            return;
        };
        if !options.filter.matches(&snapshot) {
            return;
        }
        result.stats_mut(&account.name).records_processed += 1;

        if !(snapshot.modified && snapshot.proxied) {
            return;
        }

        let restore_comment = options.restore_comments && snapshot.comment_overridden;
        let comment_before = snapshot.current_comment().map(String::from);
        let comment_after = if restore_comment {
            snapshot.comment.clone()
        } else {
            comment_before.clone()
        };

        let change = ChangeRecord {
            action: ChangeAction::restore(options.dry_run),
            account: account.name.clone(),
            account_id: account.account_id.clone(),
            zone: zone_name.to_string(),
            zone_id: key.zone_id.clone(),
            record_id: key.record_id.clone(),
            record_name: snapshot.name.clone(),
            record_type: snapshot.record_type.clone(),
            content: snapshot.content.clone(),
            proxied_before: false,
            proxied_after: true,
            comment_before,
            comment_after,
            timestamp: Utc::now(),
        };

        if options.dry_run {
            self.apply_change(&account.name, change, result);
            return;
        }

        let comment = restore_comment.then(|| snapshot.comment.clone());
        match client
            .set_proxy_state(&key.zone_id, &key.record_id, true, comment)
            .await
        {
            Ok(MutationOutcome::Applied(_)) => {
                store.clear_modified(key);
                if restore_comment {
                    store.clear_comment_override(key);
                }
                self.apply_change(&account.name, change, result);
            }
            Ok(MutationOutcome::AlreadyInState(current)) => {
                store.clear_modified(key);
                if restore_comment {
                    store.clear_comment_override(key);
                }
                self.ctx.emit(RunEvent::AlreadyInState {
                    account: account.name.clone(),
                    zone: zone_name.to_string(),
                    record_id: key.record_id.clone(),
                    record_name: snapshot.name.clone(),
                    proxied: current.proxied,
                });
            }
            Err(e) => self.record_failed(&change, &e.to_string(), result),
        }
    }

    // ===== Shared bookkeeping =====

    fn apply_change(&self, account: &str, change: ChangeRecord, result: &mut RunResult) {
        result.stats_mut(account).records_modified += 1;
        result.record_change(change.clone());
        self.ctx.emit(RunEvent::ProxyChanged(change));
    }

    fn record_failed(&self, change: &ChangeRecord, error: &str, result: &mut RunResult) {
        result.stats_mut(&change.account).errors += 1;
        self.ctx.emit(RunEvent::RecordFailed {
            account: change.account.clone(),
            zone: change.zone.clone(),
            zone_id: change.zone_id.clone(),
            record_id: change.record_id.clone(),
            record_name: change.record_name.clone(),
            action: change.action,
            error: error.to_string(),
        });
    }

    fn skip_account(&self, account: &Account, error: &CoreError, result: &mut RunResult) {
        result.stats_mut(&account.name).errors += 1;
        self.ctx.emit(RunEvent::AccountSkipped {
            account: account.name.clone(),
            reason: error.to_string(),
        });
    }

    /// Persist after an account; a failed save is counted, the run goes on.
    fn checkpoint(&self, account: &str, store: &mut StateStore, dry_run: bool, result: &mut RunResult) {
        if dry_run {
            return;
        }
        match store.save() {
            Ok(()) => self.ctx.emit(RunEvent::StateSaved {
                account: account.to_string(),
                path: store.path().display().to_string(),
            }),
            Err(e) => {
                result.stats_mut(account).errors += 1;
                self.ctx.emit(RunEvent::StateSaveFailed {
                    account: account.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn finish_account(&self, account: &str, result: &mut RunResult) {
        let stats = *result.stats_mut(account);
        self.ctx.emit(RunEvent::AccountFinished {
            account: account.to_string(),
            stats,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{RecordFilter, TagField};
    use crate::test_utils::{
        MockProvider, RecordingSink, a_record, context_with, record, test_account,
    };
    use crate::types::{DnsRecordType, Scope};
    use crate::utils::CommentTemplate;

    struct Harness {
        provider: Arc<MockProvider>,
        sink: Arc<RecordingSink>,
        service: ReconcileService,
        store: StateStore,
        _dir: tempfile::TempDir,
    }

    async fn harness(provider: MockProvider) -> Harness {
        let provider = Arc::new(provider);
        let sink = Arc::new(RecordingSink::new());
        let ctx = context_with(vec![(test_account("prod"), provider.clone())], sink.clone()).await;
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::load(dir.path().join("proxy_state.json"));
        Harness {
            provider,
            sink,
            service: ReconcileService::new(ctx),
            store,
            _dir: dir,
        }
    }

    fn three_a_records() -> MockProvider {
        MockProvider::new()
            .with_zone("z1", "example.com")
            .with_record("z1", a_record("r1", "api.example.com", true))
            .with_record("z1", a_record("r2", "www.example.com", true))
            .with_record("z1", a_record("r3", "mail.example.com", false))
    }

    fn key(record_id: &str) -> SnapshotKey {
        SnapshotKey::new("prod", "z1", record_id)
    }

    fn live() -> DisableOptions {
        DisableOptions::default()
    }

    fn dry() -> DisableOptions {
        DisableOptions {
            dry_run: true,
            ..DisableOptions::default()
        }
    }

    #[tokio::test]
    async fn disable_touches_only_proxied_records() {
        let mut h = harness(three_a_records()).await;

        let result = h.service.disable(&mut h.store, &live()).await;

        assert_eq!(result.changes.len(), 2);
        assert!(result.changes.iter().all(|c| c.action == ChangeAction::Disable));
        assert_eq!(result.total_changes, 2);

        let stats = result.accounts["prod"];
        assert_eq!(stats.zones_processed, 1);
        assert_eq!(stats.records_processed, 3);
        assert_eq!(stats.records_modified, 2);
        assert_eq!(stats.errors, 0);

        assert_eq!(h.store.zones_for_account("prod")[0].keys.len(), 3);
        assert!(h.store.snapshot(&key("r1")).unwrap().modified);
        assert!(h.store.snapshot(&key("r2")).unwrap().modified);
        assert!(!h.store.snapshot(&key("r3")).unwrap().modified);

        assert!(!h.provider.record("z1", "r1").unwrap().proxied);
        assert!(!h.provider.record("z1", "r2").unwrap().proxied);
        assert_eq!(h.provider.update_calls(), 2);
        assert!(h.store.path().exists());
    }

    #[tokio::test]
    async fn second_disable_is_a_no_op() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;
        let calls = h.provider.update_calls();

        let second = h.service.disable(&mut h.store, &live()).await;

        assert!(second.changes.is_empty());
        assert_eq!(h.provider.update_calls(), calls);
        // The first-observed proxy flag survives the now-unproxied listing.
        assert!(h.store.snapshot(&key("r1")).unwrap().proxied);
    }

    #[tokio::test]
    async fn remote_reenable_is_not_disabled_again_while_modified() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;
        h.provider.set_proxied("z1", "r1", true);

        let second = h.service.disable(&mut h.store, &live()).await;

        assert!(second.changes.is_empty());
        assert!(h.provider.record("z1", "r1").unwrap().proxied);
    }

    #[tokio::test]
    async fn dry_run_matches_live_run() {
        let mut live_h = harness(three_a_records()).await;
        let mut dry_h = harness(three_a_records()).await;

        let live_result = live_h.service.disable(&mut live_h.store, &live()).await;
        let dry_result = dry_h.service.disable(&mut dry_h.store, &dry()).await;

        assert!(dry_result.dry_run);
        assert_eq!(live_result.changes.len(), dry_result.changes.len());
        assert_eq!(live_result.accounts, dry_result.accounts);
        for (l, d) in live_result.changes.iter().zip(dry_result.changes.iter()) {
            assert_eq!(d.action, ChangeAction::WouldDisable);
            assert_eq!(l.action, d.action.live());
            assert_eq!(l.record_id, d.record_id);
            assert_eq!(l.proxied_before, d.proxied_before);
            assert_eq!(l.proxied_after, d.proxied_after);
            assert_eq!(l.comment_before, d.comment_before);
            assert_eq!(l.comment_after, d.comment_after);
        }

        assert_eq!(dry_h.provider.update_calls(), 0);
        assert_eq!(dry_h.provider.get_calls(), 0);
        assert!(dry_h.provider.record("z1", "r1").unwrap().proxied);
        assert!(!dry_h.store.snapshot(&key("r1")).unwrap().modified);
        assert!(!dry_h.store.path().exists());
    }

    #[tokio::test]
    async fn unsupported_types_are_ignored() {
        let provider = MockProvider::new()
            .with_zone("z1", "example.com")
            .with_record("z1", a_record("r1", "api.example.com", true))
            .with_record("z1", record("mx", "example.com", DnsRecordType::Other("MX".into()), true))
            .with_record("z1", record("c1", "cdn.example.com", DnsRecordType::Cname, true))
            .with_record("z1", record("v6", "v6.example.com", DnsRecordType::Aaaa, true));
        let mut h = harness(provider).await;

        let result = h.service.disable(&mut h.store, &live()).await;

        assert_eq!(result.changes.len(), 3);
        assert!(h.store.snapshot(&key("mx")).is_none());
        assert!(h.provider.record("z1", "mx").unwrap().proxied);
    }

    #[tokio::test]
    async fn name_filter_limits_targets() {
        let mut h = harness(three_a_records()).await;
        let options = DisableOptions {
            filter: RecordFilter::new(Some(r"^api\."), None).unwrap(),
            ..DisableOptions::default()
        };

        let result = h.service.disable(&mut h.store, &options).await;

        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes.as_slice()[0].record_name, "api.example.com");
        assert!(h.provider.record("z1", "r2").unwrap().proxied);
        // Filtered-out records are never snapshotted.
        assert!(h.store.snapshot(&key("r2")).is_none());
    }

    #[tokio::test]
    async fn zone_scope_matches_name_or_id() {
        let provider = three_a_records()
            .with_zone("z2", "example.org")
            .with_record("z2", a_record("o1", "www.example.org", true))
            .with_zone("z3", "example.net")
            .with_record("z3", a_record("n1", "www.example.net", true));
        let mut h = harness(provider).await;
        let options = DisableOptions {
            scope: Scope::new(Vec::<String>::new(), ["example.org", "z3"]),
            ..DisableOptions::default()
        };

        let result = h.service.disable(&mut h.store, &options).await;

        assert_eq!(result.accounts["prod"].zones_processed, 2);
        assert_eq!(result.changes.len(), 2);
        assert!(h.provider.record("z1", "r1").unwrap().proxied);
    }

    #[tokio::test]
    async fn account_scope_skips_other_accounts() {
        let mut h = harness(three_a_records()).await;
        let options = DisableOptions {
            scope: Scope::new(["staging"], Vec::<String>::new()),
            ..DisableOptions::default()
        };

        let result = h.service.disable(&mut h.store, &options).await;

        assert!(result.accounts.is_empty());
        assert_eq!(h.provider.update_calls(), 0);
    }

    #[tokio::test]
    async fn record_listing_failure_only_empties_that_zone() {
        let provider = three_a_records()
            .with_zone("z2", "example.org")
            .with_record("z2", a_record("o1", "www.example.org", true));
        provider.fail_record_listing("z1");
        let mut h = harness(provider).await;

        let result = h.service.disable(&mut h.store, &live()).await;

        let stats = result.accounts["prod"];
        assert_eq!(stats.zones_processed, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(result.changes.len(), 1);
        assert!(h.sink.events().iter().any(|e| matches!(
            e,
            RunEvent::ScopeFailed { zone_id: Some(z), .. } if z == "z1"
        )));
    }

    #[tokio::test]
    async fn zone_listing_failure_is_reported_not_fatal() {
        let provider = three_a_records();
        provider.fail_zone_listing();
        let mut h = harness(provider).await;

        let result = h.service.disable(&mut h.store, &live()).await;

        let stats = result.accounts["prod"];
        assert_eq!(stats.zones_processed, 0);
        assert_eq!(stats.errors, 1);
        assert!(result.changes.is_empty());
    }

    #[tokio::test]
    async fn failed_update_counts_error_and_continues() {
        let provider = three_a_records();
        provider.fail_updates_for("r1");
        let mut h = harness(provider).await;

        let result = h.service.disable(&mut h.store, &live()).await;

        assert_eq!(result.accounts["prod"].errors, 1);
        assert_eq!(result.changes.len(), 1);
        assert!(!h.store.snapshot(&key("r1")).unwrap().modified);
        assert!(h.store.snapshot(&key("r2")).unwrap().modified);
    }

    #[tokio::test]
    async fn disable_then_restore_round_trip() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;

        let result = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(result.changes.len(), 2);
        assert!(result.changes.iter().all(|c| c.action == ChangeAction::Restore));
        for id in ["r1", "r2"] {
            assert!(h.provider.record("z1", id).unwrap().proxied);
            assert!(!h.store.snapshot(&key(id)).unwrap().modified);
        }
        assert!(!h.provider.record("z1", "r3").unwrap().proxied);

        let reloaded = StateStore::load(h.store.path());
        assert!(!reloaded.snapshot(&key("r1")).unwrap().modified);
    }

    #[tokio::test]
    async fn restore_without_state_fails() {
        let mut h = harness(three_a_records()).await;

        let err = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::NoSavedState(_)));
        assert_eq!(h.provider.update_calls(), 0);
    }

    #[tokio::test]
    async fn restore_dry_run_changes_nothing() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;
        let calls = h.provider.update_calls();

        let options = RestoreOptions {
            dry_run: true,
            ..RestoreOptions::default()
        };
        let result = h.service.restore(&mut h.store, &options).await.unwrap();

        assert_eq!(result.changes.len(), 2);
        assert!(result
            .changes
            .iter()
            .all(|c| c.action == ChangeAction::WouldRestore));
        assert_eq!(h.provider.update_calls(), calls);
        assert!(h.store.snapshot(&key("r1")).unwrap().modified);
    }

    #[tokio::test]
    async fn restore_filters_use_snapshot_fields() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;

        let options = RestoreOptions {
            filter: RecordFilter::default().with_tags(&["WWW"], &[TagField::Name]),
            ..RestoreOptions::default()
        };
        let result = h.service.restore(&mut h.store, &options).await.unwrap();

        assert_eq!(result.changes.len(), 1);
        assert!(h.provider.record("z1", "r2").unwrap().proxied);
        assert!(!h.provider.record("z1", "r1").unwrap().proxied);
        assert!(h.store.snapshot(&key("r1")).unwrap().modified);
    }

    #[tokio::test]
    async fn restore_failure_does_not_stop_siblings() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;
        h.provider.fail_updates_for("r1");

        let result = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(result.accounts["prod"].errors, 1);
        assert_eq!(result.changes.len(), 1);
        assert!(h.store.snapshot(&key("r1")).unwrap().modified);
        assert!(!h.store.snapshot(&key("r2")).unwrap().modified);
        assert!(h.sink.events().iter().any(|e| matches!(
            e,
            RunEvent::RecordFailed { record_id, action: ChangeAction::Restore, .. } if record_id == "r1"
        )));
    }

    #[tokio::test]
    async fn restore_when_already_proxied_clears_modified_silently() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;
        h.provider.set_proxied("z1", "r1", true);
        let calls = h.provider.update_calls();

        let result = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(result.changes.len(), 1);
        assert_eq!(h.provider.update_calls(), calls + 1);
        assert!(!h.store.snapshot(&key("r1")).unwrap().modified);
        assert!(h.sink.events().iter().any(|e| matches!(
            e,
            RunEvent::AlreadyInState { record_id, .. } if record_id == "r1"
        )));
    }

    #[tokio::test]
    async fn restore_skips_unconfigured_accounts() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;

        let ghost = SnapshotKey::new("retired", "zx", "rx");
        h.store
            .get_or_create_snapshot(&ghost, "old.example", &a_record("rx", "old.example", true));
        h.store.mark_modified(&ghost);

        let result = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        assert!(!result.accounts.contains_key("retired"));
        assert_eq!(result.total_errors(), 0);
        assert!(h.sink.events().iter().any(|e| matches!(
            e,
            RunEvent::AccountSkipped { account, .. } if account == "retired"
        )));
    }

    #[tokio::test]
    async fn comment_template_is_applied_and_restored() {
        let provider = MockProvider::new().with_zone("z1", "example.com").with_record(
            "z1",
            DnsRecord {
                comment: Some("owner: web".into()),
                ..a_record("r1", "api.example.com", true)
            },
        );
        let mut h = harness(provider).await;
        let options = DisableOptions {
            comment_template: Some(
                CommentTemplate::parse("proxy off for {record_name} in {zone}").unwrap(),
            ),
            ..DisableOptions::default()
        };

        let result = h.service.disable(&mut h.store, &options).await;

        let change = &result.changes.as_slice()[0];
        assert_eq!(change.comment_before.as_deref(), Some("owner: web"));
        assert_eq!(
            change.comment_after.as_deref(),
            Some("proxy off for api.example.com in example.com")
        );
        let remote = h.provider.record("z1", "r1").unwrap();
        assert_eq!(remote.comment, change.comment_after);
        let snap = h.store.snapshot(&key("r1")).unwrap();
        assert!(snap.comment_overridden);
        assert_eq!(snap.comment.as_deref(), Some("owner: web"));

        let restore = RestoreOptions {
            restore_comments: true,
            ..RestoreOptions::default()
        };
        let result = h.service.restore(&mut h.store, &restore).await.unwrap();

        assert_eq!(
            result.changes.as_slice()[0].comment_after.as_deref(),
            Some("owner: web")
        );
        let remote = h.provider.record("z1", "r1").unwrap();
        assert!(remote.proxied);
        assert_eq!(remote.comment.as_deref(), Some("owner: web"));
        assert!(!h.store.snapshot(&key("r1")).unwrap().comment_overridden);
    }

    #[tokio::test]
    async fn comments_stay_unless_restore_is_requested() {
        let mut h = harness(three_a_records()).await;
        let options = DisableOptions {
            comment_template: Some(CommentTemplate::parse("paused").unwrap()),
            ..DisableOptions::default()
        };
        h.service.disable(&mut h.store, &options).await;

        h.service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        let remote = h.provider.record("z1", "r1").unwrap();
        assert!(remote.proxied);
        assert_eq!(remote.comment.as_deref(), Some("paused"));
        assert!(h.store.snapshot(&key("r1")).unwrap().comment_overridden);
    }

    #[tokio::test]
    async fn events_bracket_each_account() {
        let mut h = harness(three_a_records()).await;
        h.service.disable(&mut h.store, &live()).await;

        let events = h.sink.events();
        assert!(matches!(events.first(), Some(RunEvent::AccountStarted { account, .. }) if account == "prod"));
        assert!(matches!(events.last(), Some(RunEvent::AccountFinished { stats, .. }) if stats.records_modified == 2));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, RunEvent::ProxyChanged(_)))
                .count(),
            2
        );
        assert!(events.iter().any(|e| matches!(e, RunEvent::StateSaved { .. })));
    }

    #[tokio::test]
    async fn zone_listing_failure_in_one_account_does_not_stop_others() {
        let broken = Arc::new(three_a_records());
        broken.fail_zone_listing();
        let healthy = Arc::new(three_a_records());
        let sink = Arc::new(RecordingSink::new());
        let ctx = context_with(
            vec![
                (test_account("aaa"), broken.clone()),
                (test_account("bbb"), healthy.clone()),
            ],
            sink.clone(),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let mut store = StateStore::load(dir.path().join("proxy_state.json"));

        let result = ReconcileService::new(ctx).disable(&mut store, &live()).await;

        assert_eq!(result.accounts["aaa"].errors, 1);
        assert_eq!(result.accounts["aaa"].records_modified, 0);
        assert_eq!(result.accounts["bbb"].errors, 0);
        assert_eq!(result.accounts["bbb"].records_modified, 2);
        assert!(result.changes.iter().all(|c| c.account == "bbb"));
        assert_eq!(broken.update_calls(), 0);
        assert!(!healthy.record("z1", "r1").unwrap().proxied);
        assert!(sink.events().iter().any(|e| matches!(
            e,
            RunEvent::ScopeFailed { account, zone: None, .. } if account == "aaa"
        )));
    }

    #[tokio::test]
    async fn restore_zone_scope_matches_state_name_or_id() {
        let provider = three_a_records()
            .with_zone("z2", "example.org")
            .with_record("z2", a_record("o1", "www.example.org", true));
        let mut h = harness(provider).await;
        h.service.disable(&mut h.store, &live()).await;

        let scoped = |zones: &[&str]| RestoreOptions {
            scope: Scope::new(Vec::<String>::new(), zones.iter().copied()),
            ..RestoreOptions::default()
        };

        let none = h
            .service
            .restore(&mut h.store, &scoped(&["c.com"]))
            .await
            .unwrap();
        assert!(none.changes.is_empty());
        assert_eq!(none.accounts["prod"].zones_processed, 0);

        let by_name = h
            .service
            .restore(&mut h.store, &scoped(&["example.org"]))
            .await
            .unwrap();
        assert_eq!(by_name.changes.len(), 1);
        assert_eq!(by_name.accounts["prod"].zones_processed, 1);
        assert!(h.provider.record("z2", "o1").unwrap().proxied);
        assert!(!h.provider.record("z1", "r1").unwrap().proxied);

        let by_id = h.service.restore(&mut h.store, &scoped(&["z1"])).await.unwrap();
        assert_eq!(by_id.changes.len(), 2);
        assert!(h.provider.record("z1", "r1").unwrap().proxied);
    }

    #[tokio::test]
    async fn restore_counts_zones_recorded_without_records() {
        let provider = three_a_records().with_zone("z2", "empty.example");
        let mut h = harness(provider).await;
        let disabled = h.service.disable(&mut h.store, &live()).await;
        assert_eq!(disabled.accounts["prod"].zones_processed, 2);

        let result = h
            .service
            .restore(&mut h.store, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(result.accounts["prod"].zones_processed, 2);
        assert_eq!(result.changes.len(), 2);
    }
}
