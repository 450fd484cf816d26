//! Error types for chronicle modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git toolchain and target repository operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git not found on PATH. Install git 2.0 or newer.")]
    NotInstalled,

    #[error("Unsupported git version {found}. chronicle requires {minimum} or newer.")]
    VersionTooOld {
        found: semver::Version,
        minimum: semver::Version,
    },

    #[error("Could not parse git version from '{0}'")]
    VersionUnparseable(String),

    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to initialize repository at {path}: {source}")]
    InitRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to create target directory {path}: {source}")]
    CreateTargetDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Target working tree has uncommitted changes. Commit, stash, or remove them before resuming."
    )]
    DirtyWorkingTree,

    #[error("Failed to spawn git: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {operation} failed: {stderr}")]
    CommandFailed { operation: String, stderr: String },
}

/// Errors from the side-channel plan/state storage.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No plan found at {0}. Run planning first.")]
    PlanNotFound(PathBuf),

    #[error("No execution state found at {0}")]
    StateNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize document: {0}")]
    SerializeFailed(#[source] serde_json::Error),
}

/// Errors from content integrity verification.
#[derive(Error, Debug)]
pub enum IntegrityError {
    #[error("Checksum mismatch for {path}: source {expected}, copy {actual}")]
    Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to hash {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from commit planning.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No files to plan: the source tree is empty after ignore filtering")]
    NoFiles,

    #[error("Invalid schedule: days and commits-per-day must both be at least 1")]
    EmptySchedule,

    #[error("No commit with id '{0}' in the plan")]
    UnknownCommitId(String),
}

/// Errors from source tree enumeration.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source directory {0} does not exist or is not a directory")]
    Missing(PathBuf),

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to walk source tree: {0}")]
    WalkFailed(#[source] ignore::Error),
}

/// Top-level engine error, covering every phase of a run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Plan is not approved. Re-run with --review ask to review and approve it.")]
    Unapproved,

    #[error("Cancelled by operator")]
    Cancelled,

    #[error("Failed to copy {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove abandoned copy {path}: {source}")]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Planned file {0} is not under the source directory")]
    OutsideSource(PathBuf),

    #[error("Execution cursor points at day {day}, commit {index}, but the plan has no such slot")]
    CursorOutOfSync { day: u32, index: u32 },
}

/// A fatal, logged termination of the current run.
///
/// Carries the stable step identifier of the state-machine step that failed
/// so that automation wrapping the tool can distinguish halt reasons.
#[derive(Error, Debug)]
#[error("{step}: {source}")]
pub struct HaltError {
    pub step: &'static str,
    #[source]
    pub source: EngineError,
}
