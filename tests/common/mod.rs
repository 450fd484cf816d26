//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chronicle::config::{ConfirmMode, ReviewMode, RunConfig};

/// Write a file under `root`, creating parent directories as needed.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(&path, content).expect("Failed to write test file");
}

/// Lay down the seven-file scenario snapshot: 2 scaffold files, 1 build
/// file, 4 feature files.
pub fn scenario_source(root: &Path) {
    write_file(root, ".gitignore", "target/\n");
    write_file(root, "LICENSE", "MIT License\n\nCopyright (c) Demo\n");
    write_file(root, "Cargo.toml", "[package]\nname = \"demo\"\nversion = \"0.1.0\"\n");
    write_file(root, "src/codec.rs", "pub fn encode(input: &[u8]) -> Vec<u8> { input.to_vec() }\n");
    write_file(root, "src/engine.rs", "pub struct Engine;\n");
    write_file(root, "src/store.rs", "pub struct Store;\n");
    write_file(root, "src/wire.rs", "pub struct Frame;\n");
}

/// Initialize a target repository with a test identity so subprocess
/// commits succeed regardless of the environment's global git config.
pub fn init_target(path: &Path) {
    fs::create_dir_all(path).expect("Failed to create target directory");
    let repo = git2::Repository::init(path).expect("Failed to init target repo");
    let mut config = repo.config().expect("Failed to open repo config");
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();
    config.set_bool("commit.gpgsign", false).unwrap();
}

/// Baseline run configuration for engine tests: auto confirm, ask review.
pub fn run_config(source: &Path, target: &Path, days: u32, commits_per_day: u32) -> RunConfig {
    RunConfig {
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        total_days: days,
        commits_per_day,
        max_files_per_commit: None,
        ignore_patterns: Vec::new(),
        daily_run_hours: 8.0,
        confirm_mode: ConfirmMode::Auto,
        review_mode: ReviewMode::Ask,
        author: None,
        plan_only: false,
        verbose: false,
    }
}

/// Number of commits reachable from HEAD, or 0 for an unborn branch.
pub fn commit_count(target: &Path) -> usize {
    let repo = git2::Repository::open(target).expect("Failed to open target repo");
    if repo.head().is_err() {
        return 0;
    }
    let mut walk = repo.revwalk().expect("Failed to create revwalk");
    walk.push_head().expect("Failed to push HEAD");
    walk.count()
}

/// Commit messages from HEAD, oldest first.
pub fn commit_messages(target: &Path) -> Vec<String> {
    let repo = git2::Repository::open(target).expect("Failed to open target repo");
    if repo.head().is_err() {
        return Vec::new();
    }
    let mut walk = repo.revwalk().expect("Failed to create revwalk");
    walk.push_head().expect("Failed to push HEAD");

    let mut messages: Vec<String> = walk
        .map(|oid| {
            let commit = repo.find_commit(oid.unwrap()).unwrap();
            commit.message().unwrap_or("").trim().to_string()
        })
        .collect();
    messages.reverse();
    messages
}

/// Path to a document inside the target's side-channel directory.
pub fn side_channel_path(target: &Path, name: &str) -> PathBuf {
    target.join(".git").join("chronicle").join(name)
}
