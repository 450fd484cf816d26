//! Append-only diagnostic journal.
//!
//! One timestamped line per state-machine step, tagged with a stable step
//! identifier and a DONE/HALT verdict.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use tracing::warn;

/// Step verdict recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Done,
    Halt,
}

impl Verdict {
    fn as_str(&self) -> &'static str {
        match self {
            Verdict::Done => "DONE",
            Verdict::Halt => "HALT",
        }
    }
}

/// Appender for the side-channel journal file.
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one line. A journal write failure is reported as a warning
    /// but never aborts the run: the journal is an audit aid, not
    /// load-bearing state.
    pub fn record(&self, step: &str, verdict: Verdict, detail: &str) {
        if let Err(e) = self.append(step, verdict, detail) {
            warn!("journal write failed: {}", e);
        }
    }

    fn append(&self, step: &str, verdict: Verdict, detail: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if detail.is_empty() {
            writeln!(file, "{} {} {}", Utc::now().to_rfc3339(), step, verdict.as_str())
        } else {
            writeln!(
                file,
                "{} {} {} {}",
                Utc::now().to_rfc3339(),
                step,
                verdict.as_str(),
                detail
            )
        }
    }
}
