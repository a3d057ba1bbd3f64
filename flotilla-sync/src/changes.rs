//! Change Detector: working-tree status after the document is written.

use std::path::Path;

use crate::vcs::{Git, GitError};

/// `true` when `git status --porcelain` reports anything at all.
pub fn has_changes(git: &dyn Git, repo: &Path) -> Result<bool, GitError> {
    let status = git.run(repo, &["status", "--porcelain"])?;
    Ok(!status.stdout.trim().is_empty())
}
