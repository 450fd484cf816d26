//! The execution engine: a five-phase state machine over the plan.
//!
//! Phases run in order: Setup -> Planning -> Review -> Execution -> Finish,
//! with Halted as an absorbing error state reachable from any phase. Every
//! step appends one journal line; every halt carries a stable step
//! identifier and leaves persisted state untouched.

pub mod executor;

use tracing::debug;

use crate::classify::{Category, classify};
use crate::config::{ReviewMode, RunConfig};
use crate::error::{EngineError, GitError, HaltError, SourceError};
use crate::git;
use crate::journal::{Journal, Verdict};
use crate::plan::{build_plan, render_preview};
use crate::review::{Operator, apply_reword};
use crate::source::{self, SourceFile};
use crate::state::ExecutionState;
use crate::store::SideChannel;

/// Outcome of one engine invocation. Exhaustion is a clean early
/// termination, distinct from failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every planned commit is completed or skipped.
    Finished {
        completed: usize,
        skipped: usize,
        total: usize,
    },
    /// Time or commit budget reached; the next invocation resumes from the
    /// persisted cursor.
    Exhausted {
        completed: usize,
        skipped: usize,
        total: usize,
    },
    /// Operator declined approval; the plan stays unapproved.
    NotApproved,
    /// `--plan-only`: stopped after planning and review.
    PlanReady,
}

/// Drive one invocation of the engine against the configured source and
/// target.
pub fn run(config: &RunConfig, operator: &mut dyn Operator) -> Result<RunOutcome, HaltError> {
    // ── Setup ──
    let git_version =
        git::check_git_version().map_err(|e| halt_before_journal("setup.git", e.into()))?;

    println!("Setup:");
    println!("  [PASS] git {}", git_version);

    if !config.source.is_dir() {
        return Err(halt_before_journal(
            "setup.source",
            SourceError::Missing(config.source.clone()).into(),
        ));
    }
    println!("  [PASS] Source directory {}", config.source.display());

    git::open_or_init(&config.target).map_err(|e| halt_before_journal("setup.target", e.into()))?;
    let store = SideChannel::new(&config.target);
    let journal = Journal::new(store.journal_path());

    let clean = git::is_clean(&config.target)
        .map_err(|e| halt(&journal, "setup.target", e.into()))?;
    if !clean {
        return Err(halt(
            &journal,
            "setup.target",
            GitError::DirtyWorkingTree.into(),
        ));
    }
    println!("  [PASS] Target working tree is clean");

    journal.record("setup.git", Verdict::Done, &format!("git {}", git_version));
    journal.record(
        "setup.source",
        Verdict::Done,
        &config.source.display().to_string(),
    );
    journal.record(
        "setup.target",
        Verdict::Done,
        &config.target.display().to_string(),
    );

    print_config(config);

    // ── Planning ──
    // An existing plan is loaded, never rebuilt: re-running planning must
    // not discard progress.
    let mut plan = if store.plan_exists() {
        let plan = store
            .load_plan()
            .map_err(|e| halt(&journal, "plan.load", e.into()))?;
        journal.record(
            "plan.load",
            Verdict::Done,
            &format!("{} commits", plan.total_commits()),
        );
        println!(
            "[DONE] Loaded existing plan: {} commits across {} days",
            plan.total_commits(),
            plan.days.len()
        );
        plan
    } else {
        let files = source::enumerate_files(&config.source, &config.ignore_patterns)
            .map_err(|e| halt(&journal, "plan.build", e.into()))?;
        let classified: Vec<(SourceFile, Category)> = files
            .into_iter()
            .map(|f| {
                let category = classify(&f.rel);
                (f, category)
            })
            .collect();
        debug!("classified {} source files", classified.len());

        let plan = build_plan(&classified, config)
            .map_err(|e| halt(&journal, "plan.build", e.into()))?;
        store
            .save_plan(&plan)
            .map_err(|e| halt(&journal, "plan.build", e.into()))?;
        store
            .save_state(&ExecutionState::fresh(&plan.project_id))
            .map_err(|e| halt(&journal, "plan.build", e.into()))?;
        store
            .write_preview(&render_preview(&plan))
            .map_err(|e| halt(&journal, "plan.build", e.into()))?;
        journal.record(
            "plan.build",
            Verdict::Done,
            &format!("{} commits over {} files", plan.total_commits(), classified.len()),
        );
        println!(
            "[DONE] Planned {} commits across {} days from {} files",
            plan.total_commits(),
            plan.days.len(),
            classified.len()
        );
        plan
    };

    // ── Review ──
    if !plan.approved {
        match config.review_mode {
            ReviewMode::Ask => {
                println!();
                println!("{}", render_preview(&plan));

                loop {
                    let edit = operator
                        .choose_edit()
                        .map_err(|e| halt(&journal, "review.edit", e))?;
                    let Some(edit) = edit else { break };

                    match apply_reword(&mut plan, &edit) {
                        Ok(()) => {
                            store
                                .save_plan(&plan)
                                .map_err(|e| halt(&journal, "review.edit", e.into()))?;
                            store
                                .write_preview(&render_preview(&plan))
                                .map_err(|e| halt(&journal, "review.edit", e.into()))?;
                            journal.record("review.edit", Verdict::Done, &edit.commit_id);
                            println!("[DONE] Reworded {}", edit.commit_id);
                        }
                        // A typo'd id stays in the edit loop instead of
                        // killing the run.
                        Err(e) => eprintln!("[WARN] {}", e),
                    }
                }

                let approved = operator
                    .confirm("Approve this plan and begin execution?")
                    .map_err(|e| halt(&journal, "review.approve", e))?;
                if !approved {
                    journal.record("review.approve", Verdict::Done, "declined");
                    println!("Plan left unapproved. Re-run to review again.");
                    return Ok(RunOutcome::NotApproved);
                }

                plan.approved = true;
                store
                    .save_plan(&plan)
                    .map_err(|e| halt(&journal, "review.approve", e.into()))?;
                journal.record("review.approve", Verdict::Done, "approved");
                println!("[DONE] Plan approved");
            }
            ReviewMode::Skip => {
                return Err(halt(&journal, "review.approve", EngineError::Unapproved));
            }
        }
    }

    if config.plan_only {
        println!("Plan ready. Re-run without --plan-only to execute it.");
        return Ok(RunOutcome::PlanReady);
    }

    // ── Execution ──
    let mut state = if store.state_exists() {
        let state = store
            .load_state()
            .map_err(|e| halt(&journal, "exec.resume", e.into()))?;
        journal.record(
            "exec.resume",
            Verdict::Done,
            &format!("next d{}-c{}", state.next.day, state.next.index),
        );
        state
    } else {
        // First execution attempt against a plan whose state was removed.
        ExecutionState::fresh(&plan.project_id)
    };

    let outcome = executor::execute(config, &plan, &mut state, &store, &journal, operator)?;

    // ── Finish ──
    match &outcome {
        RunOutcome::Finished {
            completed,
            skipped,
            total,
        } => {
            journal.record(
                "finish",
                Verdict::Done,
                &format!("{}/{} commits", completed, total),
            );
            println!();
            if *skipped > 0 {
                println!(
                    "History synthesis complete: {}/{} commits created, {} skipped.",
                    completed, total, skipped
                );
            } else {
                println!(
                    "History synthesis complete: {}/{} commits created.",
                    completed, total
                );
            }
        }
        RunOutcome::Exhausted {
            completed,
            skipped,
            total,
        } => {
            println!();
            println!(
                "Progress: {}/{} commits settled. Re-run to continue.",
                completed + skipped,
                total
            );
        }
        RunOutcome::NotApproved | RunOutcome::PlanReady => {}
    }

    Ok(outcome)
}

/// Journal the halt, then surface it with its step identifier. No state is
/// mutated past this point.
pub(crate) fn halt(journal: &Journal, step: &'static str, source: EngineError) -> HaltError {
    journal.record(step, Verdict::Halt, &source.to_string());
    HaltError { step, source }
}

/// Halt raised before the side channel (and therefore the journal) exists.
fn halt_before_journal(step: &'static str, source: EngineError) -> HaltError {
    HaltError { step, source }
}

fn print_config(config: &RunConfig) {
    println!();
    println!("Configuration:");
    println!("  Source:        {}", config.source.display());
    println!("  Target:        {}", config.target.display());
    println!(
        "  Schedule:      {} days x {} commits/day",
        config.total_days, config.commits_per_day
    );
    if let Some(max) = config.max_files_per_commit {
        println!("  Max files:     {} per commit", max);
    }
    println!("  Daily budget:  {:.1}h", config.daily_run_hours);
    println!("  Confirm mode:  {}", config.confirm_mode);
    println!("  Review mode:   {}", config.review_mode);
    if let Some(author) = &config.author {
        println!("  Author:        {}", author);
    }
    if !config.ignore_patterns.is_empty() {
        println!("  Extra ignores: {}", config.ignore_patterns.join(", "));
    }
    println!();
}
