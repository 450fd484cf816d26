//! Target repository operations.
//!
//! Read-side inspection uses git2; mutations shell out to the system `git`
//! binary so the user's existing config and hooks apply. Every command runs
//! against an explicit working directory, never the process cwd.

use std::path::Path;
use std::process::Command;

use git2::Repository;
use semver::Version;

use crate::error::GitError;

/// Check that git is installed and recent enough to drive.
///
/// Returns the detected version. This is the engine's runtime version gate:
/// it runs once at Setup, before anything touches the target.
pub fn check_git_version() -> Result<Version, GitError> {
    which::which("git").map_err(|_| GitError::NotInstalled)?;

    let output = Command::new("git")
        .arg("--version")
        .output()
        .map_err(GitError::SpawnFailed)?;
    if !output.status.success() {
        return Err(GitError::CommandFailed {
            operation: "--version".to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let found =
        parse_git_version(&text).ok_or_else(|| GitError::VersionUnparseable(text.clone()))?;

    let minimum = Version::new(2, 0, 0);
    if found < minimum {
        return Err(GitError::VersionTooOld { found, minimum });
    }

    Ok(found)
}

/// Parse the leading `X.Y[.Z]` out of `git --version` output.
///
/// Handles vendor suffixes like `2.39.2.windows.1`.
fn parse_git_version(text: &str) -> Option<Version> {
    let re = regex_lite::Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap();
    let caps = re.captures(text)?;

    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2)?.as_str().parse().ok()?;
    let patch = caps
        .get(3)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;

    Some(Version::new(major, minor, patch))
}

/// Open the target repository, initializing a fresh one when the path has
/// no `.git` yet. The existence probe is explicit; opening is never used to
/// test for presence.
pub fn open_or_init(path: &Path) -> Result<Repository, GitError> {
    if path.join(".git").exists() {
        Repository::open(path).map_err(|e| GitError::OpenRepository {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        std::fs::create_dir_all(path).map_err(|e| GitError::CreateTargetDir {
            path: path.to_path_buf(),
            source: e,
        })?;
        Repository::init(path).map_err(|e| GitError::InitRepository {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Check that the working tree has no uncommitted or untracked changes.
pub fn is_clean(workdir: &Path) -> Result<bool, GitError> {
    let stdout = run_git(workdir, &["status", "--porcelain"], "status")?;
    Ok(stdout.trim().is_empty())
}

/// Stage exactly the given paths (relative to the working directory).
pub fn stage(workdir: &Path, rel_paths: &[String]) -> Result<(), GitError> {
    let mut args = vec!["add", "--"];
    args.extend(rel_paths.iter().map(String::as_str));
    run_git(workdir, &args, "add")?;
    Ok(())
}

/// Remove the given paths from the index without touching the files.
///
/// Works on an unborn branch too, which plain `git reset` does not.
pub fn unstage(workdir: &Path, rel_paths: &[String]) -> Result<(), GitError> {
    let mut args = vec!["rm", "--cached", "--force", "--"];
    args.extend(rel_paths.iter().map(String::as_str));
    run_git(workdir, &args, "rm --cached")?;
    Ok(())
}

/// Create a commit from the index with the given message and optional
/// author override (`Name <email>` form).
pub fn commit(workdir: &Path, message: &str, author: Option<&str>) -> Result<(), GitError> {
    let mut args = vec!["commit", "-m", message];
    if let Some(author) = author {
        args.push("--author");
        args.push(author);
    }
    run_git(workdir, &args, "commit")?;
    Ok(())
}

/// Current commit identifier of HEAD.
pub fn head_sha(workdir: &Path) -> Result<String, GitError> {
    let stdout = run_git(workdir, &["rev-parse", "HEAD"], "rev-parse")?;
    Ok(stdout.trim().to_string())
}

/// Run a git command in `workdir` and return stdout, or a descriptive error.
fn run_git(workdir: &Path, args: &[&str], operation: &str) -> Result<String, GitError> {
    let output = Command::new("git")
        .current_dir(workdir)
        .args(args)
        .output()
        .map_err(GitError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::CommandFailed {
            operation: operation.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
