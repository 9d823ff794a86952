//! File-backed state store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::snapshot::{STATE_VERSION, Snapshot, SnapshotKey, StateDocument, ZoneState};
use crate::error::{CoreError, CoreResult};
use crate::types::DnsRecord;

/// One zone of an account as recorded in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneKeys {
    pub zone_id: String,
    pub zone_name: String,
    pub keys: Vec<SnapshotKey>,
}

/// Owner of the state document.
///
/// Snapshots are only changed through this API. Nothing reaches disk until
/// [`save`](Self::save) is called.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    document: StateDocument,
    existed: bool,
}

impl StateStore {
    /// Load the document at `path`.
    ///
    /// A missing, unreadable, corrupt or unknown-version file yields an empty
    /// store; only a warning is logged.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No state file at {}, starting empty", path.display());
                return Self::empty(path);
            }
            Err(e) => {
                log::warn!(
                    "State file {} is unreadable, starting with empty state: {e}",
                    path.display()
                );
                return Self::empty_existing(path);
            }
        };

        match serde_json::from_str::<StateDocument>(&raw) {
            Ok(document) if document.version == STATE_VERSION => Self {
                path,
                document,
                existed: true,
            },
            Ok(document) => {
                log::warn!(
                    "State file {} has unsupported version {}, starting with empty state",
                    path.display(),
                    document.version
                );
                Self::empty_existing(path)
            }
            Err(e) => {
                log::warn!(
                    "State file {} is corrupted, starting with empty state: {e}",
                    path.display()
                );
                Self::empty_existing(path)
            }
        }
    }

    /// Empty store that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: StateDocument::default(),
            existed: false,
        }
    }

    fn empty_existing(path: PathBuf) -> Self {
        Self {
            existed: true,
            ..Self::empty(path)
        }
    }

    /// Whether a state file was present when the store was loaded (or has
    /// been saved since).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.existed
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn document(&self) -> &StateDocument {
        &self.document
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.document.last_updated
    }

    #[must_use]
    pub fn snapshot(&self, key: &SnapshotKey) -> Option<&Snapshot> {
        self.document
            .accounts
            .get(&key.account)?
            .get(&key.zone_id)?
            .records
            .get(&key.record_id)
    }

    fn snapshot_mut(&mut self, key: &SnapshotKey) -> Option<&mut Snapshot> {
        self.document
            .accounts
            .get_mut(&key.account)?
            .get_mut(&key.zone_id)?
            .records
            .get_mut(&key.record_id)
    }

    /// Make sure the zone entry exists; an empty `zone_name` is filled in.
    pub fn ensure_zone(&mut self, account: &str, zone_id: &str, zone_name: &str) {
        let zone = self
            .document
            .accounts
            .entry(account.to_string())
            .or_default()
            .entry(zone_id.to_string())
            .or_insert_with(|| ZoneState {
                zone_name: zone_name.to_string(),
                ..ZoneState::default()
            });
        if zone.zone_name.is_empty() {
            zone.zone_name = zone_name.to_string();
        }
    }

    /// Existing snapshot for `key`, or a new one seeded from `observed`.
    ///
    /// An existing snapshot is returned untouched, whatever `observed` holds.
    pub fn get_or_create_snapshot(
        &mut self,
        key: &SnapshotKey,
        zone_name: &str,
        observed: &DnsRecord,
    ) -> &Snapshot {
        self.ensure_zone(&key.account, &key.zone_id, zone_name);
        self.document
            .accounts
            .entry(key.account.clone())
            .or_default()
            .entry(key.zone_id.clone())
            .or_default()
            .records
            .entry(key.record_id.clone())
            .or_insert_with(|| Snapshot::observe(observed))
    }

    /// Returns `false` when there is no snapshot for `key`.
    pub fn mark_modified(&mut self, key: &SnapshotKey) -> bool {
        self.snapshot_mut(key).map(|s| s.modified = true).is_some()
    }

    /// Returns `false` when there is no snapshot for `key`.
    pub fn clear_modified(&mut self, key: &SnapshotKey) -> bool {
        self.snapshot_mut(key).map(|s| s.modified = false).is_some()
    }

    /// Remember that a run replaced the record's comment with `comment_after`.
    pub fn set_comment_override(&mut self, key: &SnapshotKey, comment_after: Option<String>) -> bool {
        self.snapshot_mut(key)
            .map(|s| {
                s.comment_overridden = true;
                s.comment_after = comment_after;
            })
            .is_some()
    }

    /// Forget a comment override after the original comment was put back.
    pub fn clear_comment_override(&mut self, key: &SnapshotKey) -> bool {
        self.snapshot_mut(key)
            .map(|s| {
                s.comment_overridden = false;
                s.comment_after = None;
            })
            .is_some()
    }

    /// Every zone recorded for `account`, in zone id order, with the keys of
    /// its snapshots. Zones without snapshots are included.
    #[must_use]
    pub fn zones_for_account(&self, account: &str) -> Vec<ZoneKeys> {
        let Some(zones) = self.document.accounts.get(account) else {
            return Vec::new();
        };
        zones
            .iter()
            .map(|(zone_id, zone)| ZoneKeys {
                zone_id: zone_id.clone(),
                zone_name: zone.zone_name.clone(),
                keys: zone
                    .records
                    .keys()
                    .map(|record_id| SnapshotKey::new(account, zone_id, record_id))
                    .collect(),
            })
            .collect()
    }

    /// Account names present in the document.
    pub fn account_names(&self) -> impl Iterator<Item = &str> {
        self.document.accounts.keys().map(String::as_str)
    }

    /// Write the whole document, stamping `last_updated`.
    ///
    /// The document goes to a sibling temporary file first, which is then
    /// renamed over the state file.
    pub fn save(&mut self) -> CoreResult<()> {
        self.document.last_updated = Some(Utc::now());

        let json = serde_json::to_string_pretty(&self.document)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::StorageError(format!("create {}: {e}", parent.display()))
            })?;
        }

        let tmp_path = self.temp_path();
        fs::write(&tmp_path, json)
            .map_err(|e| CoreError::StorageError(format!("write {}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CoreError::StorageError(format!("replace {}: {e}", self.path.display()))
        })?;

        self.existed = true;
        log::debug!("State saved to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
