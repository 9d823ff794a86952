//! Timestamp serde helpers for the state file.
//!
//! - Serialization: `DateTime<Utc>` -> RFC3339 string
//! - Deserialization: RFC3339, or an ISO 8601 timestamp without offset (read as UTC)

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse RFC3339, falling back to a naive ISO 8601 timestamp in UTC.
#[must_use]
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `Option<DateTime<Utc>>` serializer/deserializer helpers.
///
/// An unreadable timestamp loads as `None` instead of rejecting the document.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::parse_lenient;

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_lenient))
    }
}
