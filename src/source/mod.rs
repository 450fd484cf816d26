//! Read-only enumeration of the source snapshot.
//!
//! Walking honors `.gitignore` files inside the snapshot plus any extra
//! ignore patterns from the configuration. Results are sorted by relative
//! path so classification and planning are deterministic across runs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::error::SourceError;

/// One discovered source file: absolute path plus its path relative to the
/// snapshot root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rel: PathBuf,
}

/// Enumerate every file under `root`, honoring `.gitignore` rules and
/// `extra_ignores` (gitignore syntax).
pub fn enumerate_files(
    root: &Path,
    extra_ignores: &[String],
) -> Result<Vec<SourceFile>, SourceError> {
    if !root.is_dir() {
        return Err(SourceError::Missing(root.to_path_buf()));
    }

    let mut overrides = OverrideBuilder::new(root);
    for pattern in extra_ignores {
        // Leading '!' in override syntax marks the pattern as ignored.
        overrides
            .add(&format!("!{pattern}"))
            .map_err(|e| SourceError::InvalidIgnorePattern {
                pattern: pattern.clone(),
                source: e,
            })?;
    }
    let overrides = overrides.build().map_err(SourceError::WalkFailed)?;

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false)
        .require_git(false)
        .overrides(overrides)
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(SourceError::WalkFailed)?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        files.push(SourceFile {
            path: path.to_path_buf(),
            rel,
        });
    }

    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(files)
}
