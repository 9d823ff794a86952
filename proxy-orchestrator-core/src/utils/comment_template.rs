//! Annotation template rendering.
//!
//! Placeholders: `{timestamp}`, `{account}`, `{account_id}`, `{zone}`,
//! `{zone_id}`, `{record_name}`, `{record_id}`. Unknown placeholders are
//! rejected when the template is parsed.

use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::{Captures, Regex};

use crate::error::{CoreError, CoreResult};

const PLACEHOLDERS: [&str; 7] = [
    "timestamp",
    "account",
    "account_id",
    "zone",
    "zone_id",
    "record_name",
    "record_id",
];

/// Rendered in place of a missing account id.
const MISSING_VALUE: &str = "N/A";

#[allow(clippy::unwrap_used)]
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_]+)\}").unwrap());

/// Values available to a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub timestamp: DateTime<Utc>,
    pub account: &'a str,
    pub account_id: Option<&'a str>,
    pub zone: &'a str,
    pub zone_id: &'a str,
    pub record_name: &'a str,
    pub record_id: &'a str,
}

impl TemplateContext<'_> {
    fn value(&self, placeholder: &str) -> String {
        match placeholder {
            "timestamp" => self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "account" => self.account.to_string(),
            "account_id" => self.account_id.unwrap_or(MISSING_VALUE).to_string(),
            "zone" => self.zone.to_string(),
            "zone_id" => self.zone_id.to_string(),
            "record_name" => self.record_name.to_string(),
            "record_id" => self.record_id.to_string(),
            _ => String::new(),
        }
    }
}

/// Validated annotation template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTemplate {
    template: String,
}

impl CommentTemplate {
    pub fn parse(template: &str) -> CoreResult<Self> {
        if let Some(unknown) = PLACEHOLDER_RE
            .captures_iter(template)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .find(|name| !PLACEHOLDERS.contains(name))
        {
            return Err(CoreError::ValidationError(format!(
                "unknown placeholder '{{{unknown}}}' in comment template (allowed: {})",
                PLACEHOLDERS.join(", ")
            )));
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn render(&self, ctx: &TemplateContext<'_>) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.template, |caps: &Captures<'_>| ctx.value(&caps[1]))
            .into_owned()
    }
}
