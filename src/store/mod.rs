//! Side-channel storage for the plan and execution state.
//!
//! Documents live under `.git/chronicle/` inside the target repository, so
//! they are durable alongside the history being built but never tracked by
//! it. Every save is an atomic full-document replace: callers read, modify,
//! and write the whole document after every state-affecting step. That
//! write-after-every-unit-of-work discipline is what makes the engine
//! crash-safe.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::plan::Plan;
use crate::state::ExecutionState;

const SIDE_CHANNEL_DIR: &str = "chronicle";

/// Well-known paths inside the target repository's private storage area.
#[derive(Debug, Clone)]
pub struct SideChannel {
    dir: PathBuf,
}

impl SideChannel {
    /// `target` is the repository working directory.
    pub fn new(target: &Path) -> Self {
        Self {
            dir: target.join(".git").join(SIDE_CHANNEL_DIR),
        }
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dir.join("plan.json")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.join("state.json")
    }

    pub fn preview_path(&self) -> PathBuf {
        self.dir.join("preview.txt")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.dir.join("journal.log")
    }

    pub fn plan_exists(&self) -> bool {
        self.plan_path().is_file()
    }

    pub fn state_exists(&self) -> bool {
        self.state_path().is_file()
    }

    pub fn load_plan(&self) -> Result<Plan, StoreError> {
        if !self.plan_exists() {
            return Err(StoreError::PlanNotFound(self.plan_path()));
        }
        read_json(&self.plan_path())
    }

    pub fn save_plan(&self, plan: &Plan) -> Result<(), StoreError> {
        self.write_json(&self.plan_path(), plan)
    }

    pub fn load_state(&self) -> Result<ExecutionState, StoreError> {
        if !self.state_exists() {
            return Err(StoreError::StateNotFound(self.state_path()));
        }
        read_json(&self.state_path())
    }

    pub fn save_state(&self, state: &ExecutionState) -> Result<(), StoreError> {
        self.write_json(&self.state_path(), state)
    }

    pub fn write_preview(&self, text: &str) -> Result<(), StoreError> {
        self.atomic_write(&self.preview_path(), text)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let content =
            serde_json::to_string_pretty(value).map_err(StoreError::SerializeFailed)?;
        self.atomic_write(path, &content)
    }

    /// Write through a named temp file in the same directory, then persist
    /// over the destination, so readers never observe a partial document.
    fn atomic_write(&self, path: &Path, content: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::WriteFailed {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StoreError::WriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        tmp.persist(path).map_err(|e| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| StoreError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
