//! chronicle - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chronicle::config::{ConfirmMode, ReviewMode, RunConfig};
use chronicle::engine::run;
use chronicle::review::ConsoleOperator;

/// Replay a source tree into a git repository as a planned, resumable
/// commit history.
#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "Replay a source tree into a git repository as a planned, resumable commit history")]
#[command(version)]
struct Cli {
    /// Source snapshot directory (read-only)
    #[arg(long)]
    source: PathBuf,

    /// Target repository directory (created and initialized if missing)
    #[arg(long)]
    target: PathBuf,

    /// Number of simulated days to spread commits over
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Commits per simulated day
    #[arg(long = "commits-per-day", default_value_t = 3)]
    commits_per_day: u32,

    /// Maximum files per commit (default: balance the queue across slots)
    #[arg(long = "max-files-per-commit")]
    max_files_per_commit: Option<usize>,

    /// Extra ignore pattern in gitignore syntax (repeatable)
    #[arg(long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Wall-clock time budget per run, in hours
    #[arg(long = "daily-hours", default_value_t = 8.0)]
    daily_hours: f64,

    /// Per-commit confirmation mode
    #[arg(long, value_enum, default_value_t = ConfirmMode::Auto)]
    confirm: ConfirmMode,

    /// Author identity override, e.g. "Jane Doe <jane@example.com>"
    #[arg(long)]
    author: Option<String>,

    /// Plan review mode
    #[arg(long, value_enum, default_value_t = ReviewMode::Ask)]
    review: ReviewMode,

    /// Stop after planning and review without executing
    #[arg(long = "plan-only")]
    plan_only: bool,

    /// Verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    let config = RunConfig {
        source: cli.source,
        target: cli.target,
        total_days: cli.days,
        commits_per_day: cli.commits_per_day,
        max_files_per_commit: cli.max_files_per_commit,
        ignore_patterns: cli.ignore_patterns,
        daily_run_hours: cli.daily_hours,
        confirm_mode: cli.confirm,
        review_mode: cli.review,
        author: cli.author,
        plan_only: cli.plan_only,
        verbose: cli.verbose,
    };

    let mut operator = ConsoleOperator;

    match run(&config, &mut operator) {
        Ok(_) => ExitCode::SUCCESS,
        Err(halt) => {
            eprintln!();
            eprintln!("[HALT] {}", halt);
            ExitCode::FAILURE
        }
    }
}
