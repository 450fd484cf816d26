//! Durable execution state: the resumable cursor and the audit trail.
//!
//! ExecutionState is a separate artifact from the plan so that re-running
//! planning never discards progress. `completed` and `skipped` are
//! append-only; `next` is the sole cursor and always points at the first
//! not-yet-settled commit in plan order. The state is persisted after every
//! single commit, never batched, so a crash loses at most the in-flight
//! commit's file copies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::Plan;

/// Position of the next unit of work, both fields 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub day: u32,
    pub index: u32,
}

/// Audit record of one created commit. Never mutated after append.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCommit {
    pub id: String,
    pub day: u32,
    pub finished_at: DateTime<Utc>,
    /// Revision identifier reported by the target repository.
    pub commit_sha: String,
    /// Relative path -> content checksum, as verified before the commit.
    pub file_checksums: BTreeMap<String, String>,
}

/// Audit record of a commit the operator abandoned. Its files are never
/// requeued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCommit {
    pub id: String,
    pub day: u32,
    pub skipped_at: DateTime<Utc>,
}

/// The resumability cursor plus audit trail of completed work.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionState {
    pub project_id: String,
    pub completed: Vec<CompletedCommit>,
    #[serde(default)]
    pub skipped: Vec<SkippedCommit>,
    pub next: Cursor,
    /// Relative path -> last-computed content checksum.
    pub source_checksums: BTreeMap<String, String>,
}

impl ExecutionState {
    /// Fresh state pointing at the first commit of the plan.
    pub fn fresh(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            completed: Vec::new(),
            skipped: Vec::new(),
            next: Cursor { day: 1, index: 1 },
            source_checksums: BTreeMap::new(),
        }
    }

    /// Number of commits settled one way or the other.
    pub fn settled(&self) -> usize {
        self.completed.len() + self.skipped.len()
    }

    /// True once every planned commit is completed or skipped.
    pub fn is_finished(&self, plan: &Plan) -> bool {
        self.settled() >= plan.total_commits()
    }

    /// Advance `next` to the immediately following `(day, index)`, rolling
    /// over to `(day + 1, 1)` when the current day's commits are exhausted.
    pub fn advance(&mut self, plan: &Plan) {
        let day_len = plan
            .day(self.next.day)
            .map(|d| d.commits.len() as u32)
            .unwrap_or(0);

        if self.next.index < day_len {
            self.next.index += 1;
        } else {
            self.next.day += 1;
            self.next.index = 1;
        }
    }
}
