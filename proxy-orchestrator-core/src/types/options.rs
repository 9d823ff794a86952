//! Run options

use std::collections::BTreeSet;

use crate::filter::RecordFilter;
use crate::utils::CommentTemplate;

/// Which accounts and zones a run may touch.
///
/// Empty sets mean "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Account names.
    pub accounts: BTreeSet<String>,
    /// Zone names or zone ids.
    pub zones: BTreeSet<String>,
}

impl Scope {
    #[must_use]
    pub fn new<A, Z>(accounts: A, zones: Z) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        Z: IntoIterator,
        Z::Item: Into<String>,
    {
        Self {
            accounts: accounts.into_iter().map(Into::into).collect(),
            zones: zones.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn includes_account(&self, name: &str) -> bool {
        self.accounts.is_empty() || self.accounts.contains(name)
    }

    /// A zone matches by name or by id.
    #[must_use]
    pub fn includes_zone(&self, zone_name: &str, zone_id: &str) -> bool {
        self.zones.is_empty() || self.zones.contains(zone_name) || self.zones.contains(zone_id)
    }
}

/// Options of the disable flow.
#[derive(Debug, Clone, Default)]
pub struct DisableOptions {
    pub scope: Scope,
    pub filter: RecordFilter,
    pub dry_run: bool,
    /// Annotation written alongside the proxy change.
    pub comment_template: Option<CommentTemplate>,
}

/// Options of the restore flow.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub scope: Scope,
    pub filter: RecordFilter,
    pub dry_run: bool,
    /// Put back the annotation that a disable run replaced.
    pub restore_comments: bool,
}
