//! Operator decisions: approval, per-commit confirmation, and plan edits.
//!
//! Prompting is isolated behind the [`Operator`] trait so the engine's
//! state machine runs headlessly against a scripted decision source.

use std::collections::VecDeque;

use dialoguer::{Confirm, Input};

use crate::error::{EngineError, PlanError};
use crate::plan::Plan;

/// A single-field edit: reword one commit's message by id.
#[derive(Debug, Clone)]
pub struct Reword {
    pub commit_id: String,
    pub message: String,
}

/// Source of operator decisions injected into the engine.
pub trait Operator {
    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str) -> Result<bool, EngineError>;

    /// Offer a reword edit during review. `None` ends the edit loop.
    fn choose_edit(&mut self) -> Result<Option<Reword>, EngineError>;
}

/// Interactive operator backed by terminal prompts.
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn confirm(&mut self, question: &str) -> Result<bool, EngineError> {
        Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact()
            .map_err(|_| EngineError::Cancelled)
    }

    fn choose_edit(&mut self) -> Result<Option<Reword>, EngineError> {
        let wants_edit = Confirm::new()
            .with_prompt("Reword a commit message?")
            .default(false)
            .interact()
            .map_err(|_| EngineError::Cancelled)?;

        if !wants_edit {
            return Ok(None);
        }

        let commit_id: String = Input::new()
            .with_prompt("Commit id (e.g. d1-c2)")
            .interact_text()
            .map_err(|_| EngineError::Cancelled)?;
        let message: String = Input::new()
            .with_prompt("New message")
            .interact_text()
            .map_err(|_| EngineError::Cancelled)?;

        Ok(Some(Reword { commit_id, message }))
    }
}

/// Scripted operator for headless runs and tests. Confirms default to
/// "yes" once the script is exhausted.
pub struct ScriptedOperator {
    confirms: VecDeque<bool>,
    edits: VecDeque<Reword>,
}

impl ScriptedOperator {
    pub fn new(confirms: Vec<bool>, edits: Vec<Reword>) -> Self {
        Self {
            confirms: confirms.into(),
            edits: edits.into(),
        }
    }

    /// Operator that answers yes to everything and offers no edits.
    pub fn approving() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&mut self, _question: &str) -> Result<bool, EngineError> {
        Ok(self.confirms.pop_front().unwrap_or(true))
    }

    fn choose_edit(&mut self) -> Result<Option<Reword>, EngineError> {
        Ok(self.edits.pop_front())
    }
}

/// Apply a reword edit to the plan in place. The message is the only field
/// an edit may touch.
pub fn apply_reword(plan: &mut Plan, edit: &Reword) -> Result<(), PlanError> {
    let commit = plan
        .commit_mut_by_id(&edit.commit_id)
        .ok_or_else(|| PlanError::UnknownCommitId(edit.commit_id.clone()))?;
    commit.message = edit.message.clone();
    Ok(())
}
