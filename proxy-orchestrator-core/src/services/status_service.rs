//! 状态文件摘要服务

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::StateStore;

/// One snapshotted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub record_id: String,
    pub name: String,
    pub record_type: String,
    /// Proxy flag as first observed.
    pub proxied: bool,
    /// Proxy currently turned off by this tool.
    pub modified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneSummary {
    pub zone_id: String,
    pub zone_name: String,
    pub records: Vec<RecordSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub name: String,
    pub zones: Vec<ZoneSummary>,
}

/// Overview of a state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateSummary {
    pub exists: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub accounts: Vec<AccountSummary>,
    pub total_records: usize,
    pub total_modified: usize,
}

/// 状态摘要服务
pub struct StatusService;

impl StatusService {
    #[must_use]
    pub fn summarize(store: &StateStore) -> StateSummary {
        let mut total_records = 0;
        let mut total_modified = 0;

        let accounts = store
            .document()
            .accounts
            .iter()
            .map(|(name, zones)| AccountSummary {
                name: name.clone(),
                zones: zones
                    .iter()
                    .map(|(zone_id, zone)| {
                        let records: Vec<RecordSummary> = zone
                            .records
                            .iter()
                            .map(|(record_id, snap)| RecordSummary {
                                record_id: record_id.clone(),
                                name: snap.name.clone(),
                                record_type: snap.record_type.clone(),
                                proxied: snap.proxied,
                                modified: snap.modified,
                            })
                            .collect();
                        total_records += records.len();
                        total_modified += records.iter().filter(|r| r.modified).count();
                        ZoneSummary {
                            zone_id: zone_id.clone(),
                            zone_name: zone.zone_name.clone(),
                            records,
                        }
                    })
                    .collect(),
            })
            .collect();

        StateSummary {
            exists: store.exists(),
            last_updated: store.last_updated(),
            accounts,
            total_records,
            total_modified,
        }
    }
}
