//! Atomic document writer.
//!
//! The rendered workflow replaces the target file in one step:
//!
//! 1. Create missing parent directories.
//! 2. Write the content to `<path>.flotilla.tmp`.
//! 3. Rename the tmp file over the final path (atomic on POSIX).
//!
//! On rename failure the tmp file is removed and the original stays intact.
//! Content is written byte-for-byte: an unchanged document leaves the working
//! tree clean, a changed one shows up in `git status`.

use std::path::{Path, PathBuf};

use crate::error::{io_err, PathIoError};

/// Suffix appended to the target path for the in-flight copy.
pub const TMP_SUFFIX: &str = ".flotilla.tmp";

// ---------------------------------------------------------------------------
// write_document
// ---------------------------------------------------------------------------

/// Atomically replace `path` with `content`.
pub fn write_document(path: &Path, content: &str) -> Result<(), PathIoError> {
    write_with_tmp(path, content, &tmp_path(path))
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()))
}

fn write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), PathIoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
