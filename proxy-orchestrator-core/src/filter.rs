//! Record selection: name regex include/exclude and substring tag matching.
//!
//! Both predicates are optional; an absent predicate matches everything.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::types::DnsRecord;

/// Record field searched by the tag filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Name,
    Content,
    Comment,
    Type,
}

impl TagField {
    /// Fields searched when the caller does not choose any.
    pub const DEFAULT: [Self; 2] = [Self::Name, Self::Content];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Content => "content",
            Self::Comment => "comment",
            Self::Type => "type",
        }
    }
}

impl FromStr for TagField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "content" => Ok(Self::Content),
            "comment" => Ok(Self::Comment),
            "type" => Ok(Self::Type),
            other => Err(CoreError::ValidationError(format!(
                "unknown tag field '{other}' (expected name, content, comment or type)"
            ))),
        }
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the filter can be evaluated against: live records and snapshots.
pub trait FilterTarget {
    fn record_name(&self) -> &str;

    /// Value of `field`, `None` when the record has no such value.
    fn field(&self, field: TagField) -> Option<&str>;
}

impl FilterTarget for DnsRecord {
    fn record_name(&self) -> &str {
        &self.name
    }

    fn field(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Name => Some(&self.name),
            TagField::Content => Some(&self.content),
            TagField::Comment => self.comment.as_deref(),
            TagField::Type => Some(self.record_type.as_str()),
        }
    }
}

/// Compiled record filter.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
    /// Lowercased tag substrings.
    tags: Vec<String>,
    tag_fields: Vec<TagField>,
}

impl Default for RecordFilter {
    fn default() -> Self {
        Self {
            include: None,
            exclude: None,
            tags: Vec::new(),
            tag_fields: TagField::DEFAULT.to_vec(),
        }
    }
}

fn compile(kind: &str, pattern: Option<&str>) -> CoreResult<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|e| {
                CoreError::ValidationError(format!("invalid {kind} pattern '{p}': {e}"))
            })
        })
        .transpose()
}

impl RecordFilter {
    /// Filter on record names. Invalid patterns are rejected.
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> CoreResult<Self> {
        Ok(Self {
            include: compile("include", include)?,
            exclude: compile("exclude", exclude)?,
            ..Self::default()
        })
    }

    /// Add a tag filter. An empty `fields` keeps the default (name, content).
    #[must_use]
    pub fn with_tags<T: AsRef<str>>(mut self, tags: &[T], fields: &[TagField]) -> Self {
        self.tags = tags
            .iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if !fields.is_empty() {
            self.tag_fields = fields.to_vec();
        }
        self
    }

    /// Include must match (when given); exclude must not (when given).
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        if let Some(include) = &self.include
            && !include.is_match(name)
        {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(name),
            None => true,
        }
    }

    /// At least one tag must occur in the searched fields, case-insensitively.
    ///
    /// Fails closed when tags are given but none of the fields is present.
    #[must_use]
    pub fn matches_tags<R: FilterTarget + ?Sized>(&self, record: &R) -> bool {
        if self.tags.is_empty() {
            return true;
        }

        let values: Vec<String> = self
            .tag_fields
            .iter()
            .filter_map(|&f| record.field(f))
            .map(str::to_lowercase)
            .collect();
        if values.is_empty() {
            return false;
        }

        let haystack = values.concat();
        self.tags.iter().any(|tag| haystack.contains(tag.as_str()))
    }

    #[must_use]
    pub fn matches<R: FilterTarget + ?Sized>(&self, record: &R) -> bool {
        self.matches_name(record.record_name()) && self.matches_tags(record)
    }
}
