//! Change Log 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of change a run made (or would have made) to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeAction {
    /// Proxy turned off.
    #[serde(rename = "disable_proxy")]
    Disable,
    /// Dry run: proxy would have been turned off.
    #[serde(rename = "would_disable_proxy")]
    WouldDisable,
    /// Proxy turned back on.
    #[serde(rename = "restore_proxy")]
    Restore,
    /// Dry run: proxy would have been turned back on.
    #[serde(rename = "would_restore_proxy")]
    WouldRestore,
}

impl ChangeAction {
    /// Action for a disable run.
    #[must_use]
    pub fn disable(dry_run: bool) -> Self {
        if dry_run { Self::WouldDisable } else { Self::Disable }
    }

    /// Action for a restore run.
    #[must_use]
    pub fn restore(dry_run: bool) -> Self {
        if dry_run { Self::WouldRestore } else { Self::Restore }
    }

    #[must_use]
    pub fn is_dry_run(self) -> bool {
        matches!(self, Self::WouldDisable | Self::WouldRestore)
    }

    /// Same action with the dry-run tag removed.
    #[must_use]
    pub fn live(self) -> Self {
        match self {
            Self::Disable | Self::WouldDisable => Self::Disable,
            Self::Restore | Self::WouldRestore => Self::Restore,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable_proxy",
            Self::WouldDisable => "would_disable_proxy",
            Self::Restore => "restore_proxy",
            Self::WouldRestore => "would_restore_proxy",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record change made (or simulated) during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub action: ChangeAction,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub zone: String,
    pub zone_id: String,
    pub record_id: String,
    pub record_name: String,
    pub record_type: String,
    pub content: String,
    pub proxied_before: bool,
    pub proxied_after: bool,
    #[serde(default)]
    pub comment_before: Option<String>,
    #[serde(default)]
    pub comment_after: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeRecord {
    /// Whether the annotation differs before and after the change.
    #[must_use]
    pub fn comment_changed(&self) -> bool {
        self.comment_before != self.comment_after
    }
}

/// Append-only, ordered list of the changes of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ChangeRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
