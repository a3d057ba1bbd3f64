//! Unified diff between the rendered workflow and what a repository has on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use flotilla_core::{RepositoryRecord, Settings};
use flotilla_detector::scan_repositories;
use flotilla_renderer::render_workflow;

use crate::error::{io_err, PathIoError};
use crate::SyncError;

/// A single rendered file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for one repository; `diff` is `None` when the file is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoDiff {
    pub record: RepositoryRecord,
    pub diff: Option<FileDiff>,
}

/// Compare `rendered` with `<repo>/<relative>`. A missing file diffs against empty.
pub fn diff_document(
    repo: &Path,
    relative: &Path,
    rendered: &str,
) -> Result<Option<FileDiff>, PathIoError> {
    let path = repo.join(relative);
    let existing = read_existing_or_empty(&path)?;
    if existing == rendered {
        return Ok(None);
    }

    let old_header = format!("a/{}", relative.display());
    let new_header = format!("b/{}", relative.display());
    let unified = TextDiff::from_lines(existing.as_str(), rendered)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string();

    Ok(Some(FileDiff {
        path,
        unified_diff: unified,
    }))
}

/// Render once and diff it against every repository under `root`.
///
/// No files are written and git is never invoked.
pub fn diff_all(root: &Path, settings: &Settings) -> Result<Vec<RepoDiff>, SyncError> {
    let rendered = render_workflow(&settings.workflow)?;
    let mut out = Vec::new();
    for record in scan_repositories(root, &settings.scan)? {
        let diff = diff_document(&record.path, &settings.workflow.path, &rendered)?;
        out.push(RepoDiff { record, diff });
    }
    Ok(out)
}

/// `true` when writing `rendered` would change the file on disk.
pub(crate) fn differs(path: &Path, rendered: &str) -> Result<bool, PathIoError> {
    Ok(read_existing_or_empty(path)? != rendered || !path.is_file())
}

fn read_existing_or_empty(path: &Path) -> Result<String, PathIoError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}
