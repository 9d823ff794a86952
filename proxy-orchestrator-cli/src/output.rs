//! Console rendering of run results, state summaries and verifications.

use std::fmt::Write as _;

use proxy_orchestrator_core::services::{AccountVerification, StateSummary};
use proxy_orchestrator_core::types::RunResult;

const RULE: &str = "============================================================";

pub fn render_run(title: &str, result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(
        out,
        "{title}{}",
        if result.dry_run { " (DRY RUN)" } else { "" }
    );
    let _ = writeln!(out, "{RULE}");

    for (name, stats) in &result.accounts {
        let _ = writeln!(out, "\nAccount: {name}");
        let _ = writeln!(out, "  Zones processed:   {}", stats.zones_processed);
        let _ = writeln!(out, "  Records processed: {}", stats.records_processed);
        let _ = writeln!(out, "  Records modified:  {}", stats.records_modified);
        let _ = writeln!(out, "  Errors:            {}", stats.errors);
    }

    let _ = writeln!(out, "\nTotal changes: {}", result.total_changes);
    if result.total_errors() > 0 {
        let _ = writeln!(out, "Total errors:  {}", result.total_errors());
    }
    out
}

pub fn render_status(summary: &StateSummary, state_file: &str) -> String {
    let mut out = String::new();
    if !summary.exists {
        let _ = writeln!(
            out,
            "No state file found at {state_file}. Run `disable` first to record proxy state."
        );
        return out;
    }

    let _ = writeln!(out, "\n{RULE}\nSaved proxy state\n{RULE}");
    let _ = writeln!(
        out,
        "Last updated: {}",
        summary
            .last_updated
            .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339())
    );

    for account in &summary.accounts {
        let _ = writeln!(out, "\nAccount: {}", account.name);
        for zone in &account.zones {
            let _ = writeln!(out, "  Zone: {} ({})", zone.zone_name, zone.zone_id);
            for record in &zone.records {
                let _ = writeln!(
                    out,
                    "    {:<8} {:<40} {}",
                    record.record_type,
                    record.name,
                    if record.modified { "modified" } else { "active" }
                );
            }
        }
    }

    let _ = writeln!(
        out,
        "\nTotal records: {}  Modified: {}",
        summary.total_records, summary.total_modified
    );
    out
}

pub fn render_verification(v: &AccountVerification) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nAccount: {} [{}]",
        v.account,
        if v.is_ok() { "OK" } else { "FAILED" }
    );

    if let Some(status) = &v.token_status {
        let _ = writeln!(
            out,
            "  Token: {status} (id {})",
            v.token_id.as_deref().unwrap_or("N/A")
        );
    }
    if !v.accessible_accounts.is_empty() {
        out.push_str("  Accessible accounts:\n");
        for remote in &v.accessible_accounts {
            let _ = writeln!(
                out,
                "    {} {} ({})",
                remote.id,
                remote.name,
                remote.account_type.as_deref().unwrap_or("unknown")
            );
        }
    }
    match (&v.configured_account_id, v.account_id_valid) {
        (Some(id), Some(true)) => {
            let _ = writeln!(out, "  Configured account ID {id} is accessible");
        }
        (Some(id), Some(false)) => {
            let _ = writeln!(out, "  Configured account ID {id} is NOT accessible with this token");
        }
        (None, _) => out.push_str("  No account ID configured; all visible zones are in scope\n"),
        (Some(_), None) => {}
    }
    if let Some(error) = &v.error {
        let _ = writeln!(out, "  Error: {error}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proxy_orchestrator_core::services::{AccountSummary, RecordSummary, ZoneSummary};
    use proxy_orchestrator_core::types::{AccountStats, RemoteAccount};

    #[test]
    fn run_summary_marks_dry_run() {
        let mut result = RunResult::new(true);
        result.stats_mut("prod").records_modified = 2;
        let text = render_run("Disable proxy", &result);
        assert!(text.contains("Disable proxy (DRY RUN)"));
        assert!(text.contains("Account: prod"));
        assert!(text.contains("Records modified:  2"));
        assert!(!text.contains("Total errors"));
    }

    #[test]
    fn run_summary_shows_errors() {
        let mut result = RunResult::new(false);
        *result.stats_mut("prod") = AccountStats {
            errors: 1,
            ..AccountStats::default()
        };
        assert!(render_run("Restore proxy", &result).contains("Total errors:  1"));
    }

    #[test]
    fn status_without_state_prints_hint() {
        let summary = StateSummary {
            exists: false,
            last_updated: None,
            accounts: Vec::new(),
            total_records: 0,
            total_modified: 0,
        };
        assert!(render_status(&summary, "proxy_state.json").contains("No state file found"));
    }

    #[test]
    fn status_lists_records() {
        let summary = StateSummary {
            exists: true,
            last_updated: None,
            accounts: vec![AccountSummary {
                name: "prod".into(),
                zones: vec![ZoneSummary {
                    zone_id: "z1".into(),
                    zone_name: "example.com".into(),
                    records: vec![RecordSummary {
                        record_id: "r1".into(),
                        name: "www.example.com".into(),
                        record_type: "A".into(),
                        proxied: true,
                        modified: true,
                    }],
                }],
            }],
            total_records: 1,
            total_modified: 1,
        };
        let text = render_status(&summary, "proxy_state.json");
        assert!(text.contains("Zone: example.com (z1)"));
        assert!(text.contains("www.example.com"));
        assert!(text.contains("modified"));
        assert!(text.contains("Total records: 1  Modified: 1"));
    }

    #[test]
    fn verification_reports_inaccessible_scope() {
        let v = AccountVerification {
            account: "prod".into(),
            token_id: Some("t1".into()),
            token_status: Some("active".into()),
            accessible_accounts: vec![RemoteAccount {
                id: "acc-2".into(),
                name: "Other".into(),
                account_type: None,
            }],
            configured_account_id: Some("acc-1".into()),
            account_id_valid: Some(false),
            error: None,
        };
        let text = render_verification(&v);
        assert!(text.contains("[FAILED]"));
        assert!(text.contains("acc-2 Other (unknown)"));
        assert!(text.contains("acc-1 is NOT accessible"));
    }
}
