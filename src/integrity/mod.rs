//! Content integrity verification.
//!
//! SHA-256 digests are compared between every source file and its copy
//! before a commit is created, and recorded in the execution state as the
//! audit trail value. A mismatch is always fatal to the run, never retried:
//! the copy's content is suspect and must not be silently trusted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::IntegrityError;

/// Compute the SHA-256 digest of a file's contents as lowercase hex.
pub fn checksum(path: &Path) -> Result<String, IntegrityError> {
    let mut file = File::open(path).map_err(|e| IntegrityError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(|e| IntegrityError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify that `copy` has the same content as `source`.
///
/// Returns the shared digest on match; a differing copy is an error carrying
/// both digests.
pub fn verify(source: &Path, copy: &Path) -> Result<String, IntegrityError> {
    let expected = checksum(source)?;
    let actual = checksum(copy)?;

    if expected != actual {
        return Err(IntegrityError::Mismatch {
            path: copy.to_path_buf(),
            expected,
            actual,
        });
    }

    Ok(expected)
}
