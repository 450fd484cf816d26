//! Commit plan data model.
//!
//! The plan is the single source of truth for what should happen: an ordered
//! schedule of days, each holding an ordered sequence of planned commits.
//! Once approved it is immutable except for the explicit reword edit path
//! during review.

pub mod builder;
pub mod preview;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{Category, CommitType};
use crate::config::{ConfirmMode, ReviewMode};
use crate::state::Cursor;

pub use builder::build_plan;
pub use preview::render_preview;

/// The full, ordered schedule of commits to be produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    pub total_days: u32,
    pub commits_per_day: u32,
    /// Denormalized settings snapshot for audit/display.
    pub settings: PlanSettings,
    /// Ordered day records; insertion order is calendar order. Trailing
    /// days with no commits are omitted.
    pub days: Vec<Day>,
    /// Execution is forbidden while false.
    pub approved: bool,
}

/// Settings captured when the plan was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSettings {
    pub source_dir: PathBuf,
    pub max_files_per_commit: Option<usize>,
    pub daily_run_hours: f64,
    pub confirm_mode: ConfirmMode,
    pub review_mode: ReviewMode,
    pub author: Option<String>,
}

/// One simulated day of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-based sequence number.
    pub day: u32,
    /// Derived, descriptive only.
    pub summary: String,
    pub commits: Vec<PlannedCommit>,
}

/// One planned commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCommit {
    /// Deterministic id `d{day}-c{index}`, unique within the plan and
    /// globally orderable by (day, index).
    pub id: String,
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub message: String,
    /// Non-empty ordered sequence of absolute source paths.
    pub files: Vec<PathBuf>,
    pub category: Category,
    /// Short rationale for the commit's position in the schedule.
    pub why: String,
}

impl PlannedCommit {
    /// Full conventional-style commit message, `type(scope): message`.
    pub fn full_message(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{}({}): {}", self.commit_type, scope, self.message),
            None => format!("{}: {}", self.commit_type, self.message),
        }
    }
}

impl Plan {
    /// Total number of planned commits across all days.
    pub fn total_commits(&self) -> usize {
        self.days.iter().map(|d| d.commits.len()).sum()
    }

    /// The day record with the given 1-based day number.
    pub fn day(&self, day: u32) -> Option<&Day> {
        self.days.iter().find(|d| d.day == day)
    }

    /// The commit at a cursor position, if the slot exists.
    pub fn commit_at(&self, cursor: Cursor) -> Option<&PlannedCommit> {
        self.day(cursor.day)?
            .commits
            .get(cursor.index.checked_sub(1)? as usize)
    }

    /// Mutable lookup by commit id, for the reword edit path.
    pub fn commit_mut_by_id(&mut self, id: &str) -> Option<&mut PlannedCommit> {
        self.days
            .iter_mut()
            .flat_map(|d| d.commits.iter_mut())
            .find(|c| c.id == id)
    }

    /// All commits in plan order (day, then index).
    pub fn iter_commits(&self) -> impl Iterator<Item = &PlannedCommit> {
        self.days.iter().flat_map(|d| d.commits.iter())
    }
}
