//! Run reports: JSON, Markdown and CSV files written after a run.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use proxy_orchestrator_core::types::{AccountStats, ChangeRecord, RunResult};
use serde::Serialize;

const NA: &str = "N/A";

const CSV_HEADER: [&str; 14] = [
    "action",
    "account",
    "account_id",
    "zone",
    "zone_id",
    "record_id",
    "record_name",
    "record_type",
    "content",
    "proxied_before",
    "proxied_after",
    "comment_before",
    "comment_after",
    "timestamp",
];

/// Which flow produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Disable,
    Restore,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Restore => "restore",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Disable => "Proxy Disable Report",
            Self::Restore => "Proxy Restore Report",
        }
    }
}

/// Paths of the files written by [`write_reports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub markdown: PathBuf,
    pub csv: PathBuf,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    operation: &'static str,
    generated_at: String,
    #[serde(flatten)]
    result: &'a RunResult,
}

/// Write `<kind>_<YYYYmmdd_HHMMSS>.{json,md,csv}` into `dir`, creating it if needed.
pub fn write_reports(
    dir: &Path,
    kind: ReportKind,
    result: &RunResult,
    generated_at: DateTime<Local>,
) -> Result<ReportFiles> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create report directory {}", dir.display()))?;

    let stem = format!("{}_{}", kind.as_str(), generated_at.format("%Y%m%d_%H%M%S"));
    let files = ReportFiles {
        json: dir.join(format!("{stem}.json")),
        markdown: dir.join(format!("{stem}.md")),
        csv: dir.join(format!("{stem}.csv")),
    };

    let json = serde_json::to_string_pretty(&JsonReport {
        operation: kind.as_str(),
        generated_at: generated_at.to_rfc3339(),
        result,
    })?;
    write(&files.json, &json)?;
    write(&files.markdown, &render_markdown(kind, result, generated_at))?;
    write(&files.csv, &render_csv(result)?)?;

    Ok(files)
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("cannot write report {}", path.display()))
}

/// Markdown report: run metadata, per-account counters, change table.
pub fn render_markdown(kind: ReportKind, result: &RunResult, generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", kind.title());
    let _ = writeln!(out, "- Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "- Dry run: {}", if result.dry_run { "yes" } else { "no" });
    let _ = writeln!(out, "- Total changes: {}\n", result.total_changes);

    out.push_str("## Accounts\n\n");
    out.push_str("| Account | Zones | Records | Modified | Errors |\n");
    out.push_str("|---------|-------|---------|----------|--------|\n");
    for (name, stats) in &result.accounts {
        let AccountStats {
            zones_processed,
            records_processed,
            records_modified,
            errors,
        } = *stats;
        let _ = writeln!(
            out,
            "| {} | {zones_processed} | {records_processed} | {records_modified} | {errors} |",
            md_cell(name)
        );
    }

    out.push_str("\n## Changes\n\n");
    if result.changes.is_empty() {
        out.push_str("No changes.\n");
        return out;
    }
    out.push_str("| Action | Account | Zone | Record | Type | Content | Proxied | Comment |\n");
    out.push_str("|--------|---------|------|--------|------|---------|---------|---------|\n");
    for change in &result.changes {
        let comment = if change.comment_changed() {
            format!(
                "{} → {}",
                change.comment_before.as_deref().unwrap_or("-"),
                change.comment_after.as_deref().unwrap_or("-")
            )
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} → {} | {} |",
            change.action,
            md_cell(&change.account),
            md_cell(&change.zone),
            md_cell(&change.record_name),
            md_cell(&change.record_type),
            md_cell(&change.content),
            change.proxied_before,
            change.proxied_after,
            md_cell(&comment),
        );
    }
    out
}

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// One row per change; a header row even when there are none.
pub fn render_csv(result: &RunResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for change in &result.changes {
        write_change(&mut wtr, change)?;
    }
    let bytes = wtr.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

fn write_change(wtr: &mut csv::Writer<Vec<u8>>, change: &ChangeRecord) -> csv::Result<()> {
    let timestamp = change.timestamp.to_rfc3339();
    let fields: [&str; 14] = [
        change.action.as_str(),
        &change.account,
        change.account_id.as_deref().unwrap_or(NA),
        &change.zone,
        &change.zone_id,
        &change.record_id,
        &change.record_name,
        &change.record_type,
        &change.content,
        bool_str(change.proxied_before),
        bool_str(change.proxied_after),
        change.comment_before.as_deref().unwrap_or(""),
        change.comment_after.as_deref().unwrap_or(""),
        &timestamp,
    ];
    wtr.write_record(fields)
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
