//! Per-commit execution: copy, verify, stage, confirm, commit, record.
//!
//! The loop runs commits in strict plan order and persists the execution
//! state after every single commit, never batched. Budgets are a soft
//! preemption: checked before each commit, never mid-flight, so exceeding
//! one ends the run cleanly and the next invocation resumes from the
//! persisted cursor.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::config::{ConfirmMode, RunConfig};
use crate::error::{EngineError, HaltError, IntegrityError};
use crate::git;
use crate::integrity;
use crate::journal::{Journal, Verdict};
use crate::plan::{Plan, PlannedCommit};
use crate::review::Operator;
use crate::state::{CompletedCommit, ExecutionState, SkippedCommit};
use crate::store::SideChannel;

use super::{RunOutcome, halt};

/// One file copied into the target and awaiting verification.
struct StagedFile {
    source: PathBuf,
    dest: PathBuf,
    rel: String,
}

/// Run pending commits from the cursor until the plan finishes or a budget
/// is exhausted.
pub fn execute(
    config: &RunConfig,
    plan: &Plan,
    state: &mut ExecutionState,
    store: &SideChannel,
    journal: &Journal,
    operator: &mut dyn Operator,
) -> Result<RunOutcome, HaltError> {
    let started = Instant::now();
    let budget = Duration::from_secs_f64(config.daily_run_hours * 3600.0);
    let mut executed_this_run: u32 = 0;

    loop {
        if state.is_finished(plan) {
            return Ok(RunOutcome::Finished {
                completed: state.completed.len(),
                skipped: state.skipped.len(),
                total: plan.total_commits(),
            });
        }

        if executed_this_run >= config.commits_per_day {
            journal.record("exec.budget", Verdict::Done, "daily commit quota reached");
            println!(
                "[DONE] Daily commit quota reached ({} commits). Resume with the next run.",
                executed_this_run
            );
            return Ok(exhausted(state, plan));
        }
        if started.elapsed() >= budget {
            journal.record("exec.budget", Verdict::Done, "daily time budget reached");
            println!("[DONE] Daily time budget reached. Resume with the next run.");
            return Ok(exhausted(state, plan));
        }

        let cursor = state.next;
        let Some(commit) = plan.commit_at(cursor) else {
            return Err(halt(
                journal,
                "exec.record",
                EngineError::CursorOutOfSync {
                    day: cursor.day,
                    index: cursor.index,
                },
            ));
        };

        run_one(config, plan, commit, state, store, journal, operator)?;
        executed_this_run += 1;
    }
}

/// Execute a single planned commit at the cursor.
#[allow(clippy::too_many_arguments)]
fn run_one(
    config: &RunConfig,
    plan: &Plan,
    commit: &PlannedCommit,
    state: &mut ExecutionState,
    store: &SideChannel,
    journal: &Journal,
    operator: &mut dyn Operator,
) -> Result<(), HaltError> {
    let day = state.next.day;

    // 1. Copy every file to its relative path under the target.
    let staged = copy_files(config, commit).map_err(|e| halt(journal, "exec.copy", e))?;
    journal.record(
        "exec.copy",
        Verdict::Done,
        &format!("{} ({} files)", commit.id, staged.len()),
    );

    // 2. Verify every copy before anything is staged. A mismatch halts the
    // run with no commit created and the persisted state untouched.
    let checksums =
        verify_files(&staged).map_err(|e| halt(journal, "exec.verify", e.into()))?;
    for (rel, digest) in &checksums {
        state.source_checksums.insert(rel.clone(), digest.clone());
    }
    journal.record("exec.verify", Verdict::Done, &commit.id);

    // 3. Stage exactly those files.
    let rels: Vec<String> = staged.iter().map(|f| f.rel.clone()).collect();
    git::stage(&config.target, &rels).map_err(|e| halt(journal, "exec.stage", e.into()))?;
    journal.record("exec.stage", Verdict::Done, &commit.id);

    // 4. Optional confirmation gate. Skip permanently abandons this
    // commit's files: they are unstaged, removed from the target tree, and
    // never requeued.
    if config.confirm_mode == ConfirmMode::Manual {
        println!("Staged for {}:", commit.id);
        for rel in &rels {
            println!("  {}", rel);
        }
        let proceed = operator
            .confirm(&format!("Create commit {}?", commit.id))
            .map_err(|e| halt(journal, "exec.confirm", e))?;
        if !proceed {
            abandon(config, &staged).map_err(|e| halt(journal, "exec.skip", e))?;
            state.skipped.push(SkippedCommit {
                id: commit.id.clone(),
                day,
                skipped_at: Utc::now(),
            });
            state.advance(plan);
            store
                .save_state(state)
                .map_err(|e| halt(journal, "exec.skip", e.into()))?;
            journal.record("exec.skip", Verdict::Done, &commit.id);
            println!("[SKIP] {} abandoned by operator", commit.id);
            return Ok(());
        }
    }

    // 5. Create the revision.
    let message = commit.full_message();
    git::commit(&config.target, &message, config.author.as_deref())
        .map_err(|e| halt(journal, "exec.commit", e.into()))?;
    let sha = git::head_sha(&config.target).map_err(|e| halt(journal, "exec.commit", e.into()))?;
    journal.record(
        "exec.commit",
        Verdict::Done,
        &format!("{} {}", commit.id, sha),
    );

    // 6-8. Append the audit record, advance the cursor, persist immediately.
    state.completed.push(CompletedCommit {
        id: commit.id.clone(),
        day,
        finished_at: Utc::now(),
        commit_sha: sha,
        file_checksums: checksums,
    });
    state.advance(plan);
    store
        .save_state(state)
        .map_err(|e| halt(journal, "exec.record", e.into()))?;
    journal.record("exec.record", Verdict::Done, &commit.id);
    println!("[DONE] {}  {}", commit.id, message);

    Ok(())
}

fn copy_files(config: &RunConfig, commit: &PlannedCommit) -> Result<Vec<StagedFile>, EngineError> {
    let mut staged = Vec::with_capacity(commit.files.len());
    for file in &commit.files {
        let rel = file
            .strip_prefix(&config.source)
            .map_err(|_| EngineError::OutsideSource(file.clone()))?;
        let dest = config.target.join(rel);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| EngineError::CopyFailed {
                path: dest.clone(),
                source: e,
            })?;
        }
        fs::copy(file, &dest).map_err(|e| EngineError::CopyFailed {
            path: file.clone(),
            source: e,
        })?;

        staged.push(StagedFile {
            source: file.clone(),
            dest,
            rel: rel.to_string_lossy().into_owned(),
        });
    }
    Ok(staged)
}

fn verify_files(staged: &[StagedFile]) -> Result<BTreeMap<String, String>, IntegrityError> {
    let mut checksums = BTreeMap::new();
    for file in staged {
        let digest = integrity::verify(&file.source, &file.dest)?;
        checksums.insert(file.rel.clone(), digest);
    }
    Ok(checksums)
}

/// Undo a declined commit: unstage the files and remove the copies so the
/// working tree is clean for the next commit.
fn abandon(config: &RunConfig, staged: &[StagedFile]) -> Result<(), EngineError> {
    let rels: Vec<String> = staged.iter().map(|f| f.rel.clone()).collect();
    git::unstage(&config.target, &rels)?;
    for file in staged {
        fs::remove_file(&file.dest).map_err(|e| EngineError::CleanupFailed {
            path: file.dest.clone(),
            source: e,
        })?;
    }
    Ok(())
}

fn exhausted(state: &ExecutionState, plan: &Plan) -> RunOutcome {
    RunOutcome::Exhausted {
        completed: state.completed.len(),
        skipped: state.skipped.len(),
        total: plan.total_commits(),
    }
}
