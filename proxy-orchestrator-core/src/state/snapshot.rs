//! State document types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{FilterTarget, TagField};
use crate::types::DnsRecord;

/// Current state document version.
pub const STATE_VERSION: u32 = 1;

/// Location of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub account: String,
    pub zone_id: String,
    pub record_id: String,
}

impl SnapshotKey {
    pub fn new(
        account: impl Into<String>,
        zone_id: impl Into<String>,
        record_id: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            zone_id: zone_id.into(),
            record_id: record_id.into(),
        }
    }
}

/// First-observed state of one record.
///
/// `name`, `record_type`, `content`, `proxied` and `comment` are written once
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub proxied: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub modified: bool,
    /// A disable run replaced the comment.
    #[serde(default)]
    pub comment_overridden: bool,
    /// Comment written by that run.
    #[serde(default)]
    pub comment_after: Option<String>,
}

impl Snapshot {
    /// Snapshot seeded from a live record, `modified = false`.
    #[must_use]
    pub fn observe(record: &DnsRecord) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.record_type.as_str().to_string(),
            content: record.content.clone(),
            proxied: record.proxied,
            comment: record.comment.clone(),
            modified: false,
            comment_overridden: false,
            comment_after: None,
        }
    }

    /// Comment the record currently carries, as far as the state knows.
    #[must_use]
    pub fn current_comment(&self) -> Option<&str> {
        if self.comment_overridden {
            self.comment_after.as_deref()
        } else {
            self.comment.as_deref()
        }
    }
}

impl FilterTarget for Snapshot {
    fn record_name(&self) -> &str {
        &self.name
    }

    fn field(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Name => Some(&self.name),
            TagField::Content => Some(&self.content),
            TagField::Comment => self.comment.as_deref(),
            TagField::Type => Some(&self.record_type),
        }
    }
}

/// Snapshots of one zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    pub zone_name: String,
    #[serde(default)]
    pub records: BTreeMap<String, Snapshot>,
}

/// Zones of one account, keyed by zone id.
pub type AccountState = BTreeMap<String, ZoneState>;

/// The persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u32,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountState>,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            last_updated: None,
            accounts: BTreeMap::new(),
        }
    }
}
