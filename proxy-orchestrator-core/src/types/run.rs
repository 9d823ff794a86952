//! Run Result 类型定义

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ChangeLog, ChangeRecord};

/// Counters for one account in one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub zones_processed: usize,
    pub records_processed: usize,
    /// Records disabled or restored (or that would be, in a dry run).
    pub records_modified: usize,
    pub errors: usize,
}

/// Outcome of one disable or restore run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub dry_run: bool,
    pub accounts: BTreeMap<String, AccountStats>,
    pub changes: ChangeLog,
    pub total_changes: usize,
}

impl RunResult {
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Counters for `account`, created on first use.
    pub fn stats_mut(&mut self, account: &str) -> &mut AccountStats {
        self.accounts.entry(account.to_string()).or_default()
    }

    /// Append a change and keep `total_changes` in step.
    pub fn record_change(&mut self, change: ChangeRecord) {
        self.changes.push(change);
        self.total_changes = self.changes.len();
    }

    #[must_use]
    pub fn total_errors(&self) -> usize {
        self.accounts.values().map(|s| s.errors).sum()
    }
}
