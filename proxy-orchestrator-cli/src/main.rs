//! Proxy Orchestrator CLI
//!
//! Disables the Cloudflare proxy for selected DNS records across accounts,
//! remembers what it changed, and restores it later.

mod config;
mod logging;
mod output;
mod report;
mod sink;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use proxy_orchestrator_core::types::{DisableOptions, RestoreOptions, RunResult, Scope};
use proxy_orchestrator_core::utils::CommentTemplate;
use proxy_orchestrator_core::{
    CoreError, RecordFilter, ReconcileService, ServiceContext, StateStore, StatusService,
    TagField, VerifyService,
};
use tracing::{error, info};

use crate::report::ReportKind;
use crate::sink::TracingEventSink;

#[derive(Parser)]
#[command(
    name = "proxy-orchestrator",
    about = "Disable and restore the Cloudflare proxy on DNS records across accounts",
    version
)]
struct Cli {
    /// State file recording the original proxy settings
    #[arg(
        long,
        global = true,
        env = "PROXY_ORCHESTRATOR_STATE_FILE",
        default_value = "proxy_state.json"
    )]
    state_file: PathBuf,

    /// Directory for the JSON log file
    #[arg(long, global = true, env = "PROXY_ORCHESTRATOR_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Write JSON, Markdown and CSV reports of disable/restore runs here
    #[arg(long, global = true, env = "PROXY_ORCHESTRATOR_REPORT_DIR")]
    report_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn the proxy off for matching records, saving their original state
    Disable {
        #[command(flatten)]
        filters: FilterArgs,

        /// Show what would change without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Comment written on disabled records, e.g. "proxy off {timestamp} ({zone})"
        #[arg(long)]
        comment_template: Option<String>,
    },
    /// Turn the proxy back on for records a previous run disabled
    Restore {
        #[command(flatten)]
        filters: FilterArgs,

        /// Show what would change without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Put back the comments replaced by --comment-template
        #[arg(long)]
        restore_comments: bool,
    },
    /// Show the saved proxy state
    Status,
    /// Check the configured API tokens and account IDs
    Verify,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only these accounts (comma separated)
    #[arg(long, value_delimiter = ',')]
    accounts: Vec<String>,

    /// Only these zones, by name or ID (comma separated)
    #[arg(long, value_delimiter = ',')]
    zones: Vec<String>,

    /// Only records whose name matches this regex
    #[arg(long)]
    include: Option<String>,

    /// Skip records whose name matches this regex
    #[arg(long)]
    exclude: Option<String>,

    /// Only records containing this text (repeatable, any may match)
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Record field searched for tags: name, content, comment or type (repeatable)
    #[arg(long = "tag-field", value_name = "FIELD")]
    tag_fields: Vec<TagField>,
}

impl FilterArgs {
    fn scope(&self) -> Scope {
        let clean = |values: &[String]| -> Vec<String> {
            values
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect()
        };
        Scope::new(clean(&self.accounts), clean(&self.zones))
    }

    fn filter(&self) -> Result<RecordFilter, CoreError> {
        Ok(
            RecordFilter::new(self.include.as_deref(), self.exclude.as_deref())?
                .with_tags(&self.tags, &self.tag_fields),
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match logging::init(&cli.log_dir, cli.verbose) {
        Ok(path) => tracing::debug!(path = %path.display(), "Logging to file"),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        state_file,
        report_dir,
        command,
        ..
    } = cli;

    if let Commands::Status = command {
        let store = StateStore::load(&state_file);
        print!(
            "{}",
            output::render_status(
                &StatusService::summarize(&store),
                &state_file.display().to_string()
            )
        );
        return Ok(ExitCode::SUCCESS);
    }

    let accounts = config::accounts_from_env()?;
    info!(count = accounts.len(), "Loaded accounts");
    let ctx = Arc::new(ServiceContext::bootstrap(accounts, Arc::new(TracingEventSink)).await?);

    match command {
        Commands::Disable {
            filters,
            dry_run,
            comment_template,
        } => {
            let options = DisableOptions {
                scope: filters.scope(),
                filter: filters.filter()?,
                dry_run,
                comment_template: comment_template
                    .as_deref()
                    .map(CommentTemplate::parse)
                    .transpose()?,
            };
            let mut store = StateStore::load(&state_file);
            let result = ReconcileService::new(ctx).disable(&mut store, &options).await;
            finish_run(ReportKind::Disable, &result, report_dir.as_deref())
        }
        Commands::Restore {
            filters,
            dry_run,
            restore_comments,
        } => {
            let options = RestoreOptions {
                scope: filters.scope(),
                filter: filters.filter()?,
                dry_run,
                restore_comments,
            };
            let mut store = StateStore::load(&state_file);
            match ReconcileService::new(ctx).restore(&mut store, &options).await {
                Ok(result) => finish_run(ReportKind::Restore, &result, report_dir.as_deref()),
                Err(e @ CoreError::NoSavedState(_)) => {
                    error!("{e}");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Verify => {
            let results = VerifyService::new(ctx).verify_all().await;
            for verification in &results {
                print!("{}", output::render_verification(verification));
            }
            Ok(if results.iter().all(|v| v.is_ok()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Status => Ok(ExitCode::SUCCESS),
    }
}

/// Print the summary, write reports, and map the error count to the exit code.
fn finish_run(
    kind: ReportKind,
    result: &RunResult,
    report_dir: Option<&std::path::Path>,
) -> Result<ExitCode> {
    let title = match kind {
        ReportKind::Disable => "Disable proxy",
        ReportKind::Restore => "Restore proxy",
    };
    print!("{}", output::render_run(title, result));

    if let Some(dir) = report_dir {
        let files = report::write_reports(dir, kind, result, Local::now())?;
        info!(
            json = %files.json.display(),
            markdown = %files.markdown.display(),
            csv = %files.csv.display(),
            "Reports written"
        );
    }

    Ok(if result.total_errors() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
