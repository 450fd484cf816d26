//! chronicle - replay a source tree into a git repository as a planned,
//! resumable commit history.
//!
//! # Overview
//!
//! chronicle classifies every file in a source snapshot, bin-packs the
//! files into an ordered schedule of commits spread over simulated days,
//! persists that plan durably inside the target repository, and executes it
//! across invocations: each run resumes from a persisted cursor, verifies
//! byte-level integrity of every copied file before committing, and stops
//! cleanly when the daily time or commit budget is reached.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod git;
pub mod integrity;
pub mod journal;
pub mod plan;
pub mod review;
pub mod source;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use classify::{Category, CommitType, classify};
pub use config::{ConfirmMode, ReviewMode, RunConfig};
pub use engine::{RunOutcome, run};
pub use error::{
    EngineError, GitError, HaltError, IntegrityError, PlanError, SourceError, StoreError,
};
pub use plan::{Day, Plan, PlannedCommit, build_plan, render_preview};
pub use review::{ConsoleOperator, Operator, Reword, ScriptedOperator};
pub use state::{CompletedCommit, Cursor, ExecutionState, SkippedCommit};
pub use store::SideChannel;
