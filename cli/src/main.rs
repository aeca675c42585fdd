//! CLI for the Ticket Migrator.
//!
//! Reads a CSV ticket export and an identity mapping, then creates one
//! ZenHub issue per ticket, moves it into the matching pipeline and
//! verifies it.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use ticket_migrator::{MismatchPolicy, RunSummary, Runner, RunnerConfig, RunnerError};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Ticket Migrator - Move CSV ticket exports into ZenHub pipelines.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the tickets CSV export.
    #[arg(long, default_value = "tickets.csv")]
    tickets: PathBuf,

    /// Path to the identity mapping CSV.
    #[arg(long, default_value = "users.csv")]
    users: PathBuf,

    /// Path to the settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// ZenHub API token.
    #[arg(long, env = "ZENHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Workspace holding the target pipelines.
    #[arg(long, env = "ZENHUB_WORKSPACE_ID")]
    workspace_id: Option<String>,

    /// Repository to create issues in.
    #[arg(long)]
    repository_id: Option<String>,

    /// Preview payloads and pipelines without creating issues.
    #[arg(long)]
    dry_run: bool,

    /// What to do when a created issue can't be verified (abort or continue).
    #[arg(long)]
    mismatch_policy: Option<MismatchPolicy>,

    /// Minimum similarity (0.0-1.0) for automatic pipeline matching.
    #[arg(long)]
    similarity_threshold: Option<f64>,

    /// Prefix of the label recording the source ticket number.
    #[arg(long)]
    label_prefix: Option<String>,

    /// Pipeline used when a status can't be matched automatically.
    #[arg(long)]
    fallback_stage: Option<String>,

    /// Send ticket estimates after moving each issue.
    #[arg(long)]
    apply_estimates: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Uses compact single-line output and reads the level from `RUST_LOG`,
/// falling back to `info`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let mut config = RunnerConfig::new(args.tickets, args.users, args.token, args.dry_run);
    if let Some(path) = args.config {
        config = config.with_config_path(path);
    }
    if let Some(id) = args.workspace_id {
        config = config.with_workspace_id(id);
    }
    if let Some(id) = args.repository_id {
        config = config.with_repository_id(id);
    }
    if let Some(policy) = args.mismatch_policy {
        config = config.with_mismatch_policy(policy);
    }
    if let Some(threshold) = args.similarity_threshold {
        config = config.with_similarity_threshold(threshold);
    }
    if let Some(prefix) = args.label_prefix {
        config = config.with_label_prefix(prefix);
    }
    if let Some(stage) = args.fallback_stage {
        config = config.with_fallback_stage(stage);
    }
    if args.apply_estimates {
        config = config.with_apply_estimates(true);
    }

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints per-ticket outcomes and the final run summary.
fn print_summary(summary: &RunSummary) {
    if !summary.outcomes.is_empty() {
        println!("\nOutcomes:");
        for outcome in &summary.outcomes {
            println!("  {outcome}");
            for warning in &outcome.warnings {
                println!("    warning: {warning}");
            }
        }
    }

    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Tickets read: {}", summary.tickets_read);

    if !summary.dry_run {
        println!("  Migrated: {}", summary.tickets_migrated);
        println!("  Partially migrated: {}", summary.tickets_partial);
    }
    println!("  Failed: {}", summary.tickets_failed);

    if summary.aborted {
        println!(
            "  Aborted after a verification mismatch; {} tickets not attempted",
            summary.tickets_not_attempted
        );
    }
}
