//! Manual confirmation gate tests: the skip escape hatch and the
//! dirty-tree setup precondition.

mod common;

use chronicle::config::{ConfirmMode, RunConfig};
use chronicle::engine::{RunOutcome, run};
use chronicle::review::ScriptedOperator;
use chronicle::state::Cursor;
use chronicle::store::SideChannel;

use common::{commit_count, init_target, run_config, scenario_source, write_file};

fn setup(dir: &tempfile::TempDir) -> RunConfig {
    let source = dir.path().join("snapshot");
    let target = dir.path().join("repo");
    scenario_source(&source);
    init_target(&target);
    run_config(&source, &target, 2, 2)
}

#[test]
fn test_operator_skip_abandons_commit_and_advances_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = setup(&dir);
    config.confirm_mode = ConfirmMode::Manual;
    config.max_files_per_commit = Some(2);

    // Confirms: approve the plan, skip d1-c1, create d1-c2.
    let mut operator = ScriptedOperator::new(vec![true, false, true], Vec::new());
    let outcome = run(&config, &mut operator).unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Exhausted {
            completed: 1,
            skipped: 1,
            total: 4
        }
    );

    // Only one commit exists; the skipped scaffold files never landed.
    assert_eq!(commit_count(&config.target), 1);
    assert!(!config.target.join(".gitignore").exists());
    assert!(!config.target.join("LICENSE").exists());
    assert!(config.target.join("Cargo.toml").exists());

    // The skip is recorded explicitly and the cursor advanced past it.
    let store = SideChannel::new(&config.target);
    let state = store.load_state().unwrap();
    assert_eq!(state.skipped.len(), 1);
    assert_eq!(state.skipped[0].id, "d1-c1");
    assert_eq!(state.completed.len(), 1);
    assert_eq!(state.completed[0].id, "d1-c2");
    assert_eq!(state.next, Cursor { day: 2, index: 1 });

    // The working tree is clean, so the next invocation's setup passes and
    // the skipped files are never retried.
    let mut operator = ScriptedOperator::new(vec![true, true], Vec::new());
    let outcome = run(&config, &mut operator).unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Finished {
            completed: 3,
            skipped: 1,
            total: 4
        }
    );
    assert!(!config.target.join(".gitignore").exists());
}

#[test]
fn test_dirty_target_tree_halts_at_setup() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(&dir);
    write_file(&config.target, "stray.txt", "uncommitted leftovers\n");

    let mut operator = ScriptedOperator::approving();
    let halt = run(&config, &mut operator).unwrap_err();
    assert_eq!(halt.step, "setup.target");
    assert!(halt.to_string().contains("uncommitted changes"));
    assert_eq!(commit_count(&config.target), 0);
}

#[test]
fn test_missing_source_halts_at_setup() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("repo");
    init_target(&target);
    let config = run_config(&dir.path().join("nope"), &target, 2, 2);

    let mut operator = ScriptedOperator::approving();
    let halt = run(&config, &mut operator).unwrap_err();
    assert_eq!(halt.step, "setup.source");
}

#[test]
fn test_fresh_target_is_initialized() {
    // A target that does not exist yet is created and initialized, and the
    // side-channel documents land inside its new .git directory.
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("snapshot");
    scenario_source(&source);
    let target = dir.path().join("brand-new");
    let mut config = run_config(&source, &target, 1, 1);
    config.plan_only = true;

    let mut operator = ScriptedOperator::approving();
    let outcome = run(&config, &mut operator).unwrap();
    assert_eq!(outcome, RunOutcome::PlanReady);
    assert!(target.join(".git").is_dir());
    assert!(common::side_channel_path(&target, "plan.json").is_file());
}
