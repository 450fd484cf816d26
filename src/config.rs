//! Run configuration, constructed once at startup and passed by reference
//! into the engine and its collaborators.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Per-commit confirmation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmMode {
    /// Present the staged file list before every commit and accept
    /// proceed/skip.
    Manual,
    /// Create every commit without prompting.
    Auto,
}

impl std::fmt::Display for ConfirmMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfirmMode::Manual => write!(f, "manual"),
            ConfirmMode::Auto => write!(f, "auto"),
        }
    }
}

/// Plan review mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewMode {
    /// Render the preview, offer reword edits, and ask for approval.
    Ask,
    /// Skip the prompts; an unapproved plan is then a fatal precondition.
    Skip,
}

impl std::fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewMode::Ask => write!(f, "ask"),
            ReviewMode::Skip => write!(f, "skip"),
        }
    }
}

/// Configuration for one engine run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Read-only source snapshot directory.
    pub source: PathBuf,
    /// Target repository working directory.
    pub target: PathBuf,
    /// Number of simulated days to spread commits over.
    pub total_days: u32,
    /// Commits per simulated day; also the per-invocation commit quota.
    pub commits_per_day: u32,
    /// Optional cap on files per commit; defaults to balancing the queue
    /// across all slots.
    pub max_files_per_commit: Option<usize>,
    /// Extra ignore patterns in gitignore syntax.
    pub ignore_patterns: Vec<String>,
    /// Wall-clock time budget per invocation, in hours.
    pub daily_run_hours: f64,
    pub confirm_mode: ConfirmMode,
    pub review_mode: ReviewMode,
    /// Author identity override, e.g. `Jane Doe <jane@example.com>`.
    pub author: Option<String>,
    /// Stop after planning and review without executing.
    pub plan_only: bool,
    pub verbose: bool,
}

impl RunConfig {
    /// Project identifier derived from the source directory name.
    pub fn project_id(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }
}
