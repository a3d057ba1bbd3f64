//! Repository discovery for `flotilla-detector`.
//!
//! `scan_repositories(root, settings)` inspects the immediate subdirectories
//! of `root`; a subdirectory participates when it holds the build
//! configuration file (`Taskfile.yml` by default). The version reference is
//! read from that file's `vars` mapping.
//!
//! One unparsable configuration never aborts discovery: the repository is
//! logged and left out of the result.

use std::fs;
use std::path::{Path, PathBuf};

use flotilla_core::{RepositoryRecord, ScanSettings};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Errors from repository discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root itself cannot be listed. Fatal to the run.
    #[error("cannot read scan root {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// The part of a build configuration we read.
#[derive(Debug, Default, Deserialize)]
struct BuildConfig {
    #[serde(default)]
    vars: Option<Mapping>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Discover participating repositories directly under `root`.
///
/// Results are sorted by directory name. Returns `ScanError::Root` only when
/// `root` cannot be listed; per-repository failures are logged and skipped.
pub fn scan_repositories(
    root: &Path,
    settings: &ScanSettings,
) -> Result<Vec<RepositoryRecord>, ScanError> {
    let entries = fs::read_dir(root).map_err(|source| ScanError::Root {
        path: root.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    candidates.sort();

    let mut repos = Vec::new();
    for repo in candidates {
        let config = repo.join(&settings.config_file);
        if !config.is_file() {
            continue;
        }
        match extract_version_ref(&config, &settings.version_key) {
            Ok(version_ref) => {
                tracing::debug!(
                    repo = %repo.display(),
                    version_ref = %version_ref,
                    "discovered repository"
                );
                repos.push(RepositoryRecord::new(repo, version_ref));
            }
            Err(err) => {
                tracing::warn!(
                    config = %config.display(),
                    error = %err,
                    "skipping repository with unreadable build configuration"
                );
            }
        }
    }
    Ok(repos)
}

/// Read `vars.<key>` from the first YAML document of the build configuration
/// at `path`; later documents are ignored.
///
/// An absent key, absent `vars`, null value, or a file with no document at
/// all (empty or comments only) yields an empty string, and the repository
/// still participates. Non-text values are coerced to their text form.
pub fn extract_version_ref(path: &Path, key: &str) -> Result<String, ScanError> {
    let contents = fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = match serde_yaml::Deserializer::from_str(&contents).next() {
        Some(document) => {
            Option::<BuildConfig>::deserialize(document).map_err(|source| ScanError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        }
        None => None,
    };

    Ok(config
        .and_then(|c| c.vars)
        .and_then(|vars| vars.get(key).map(value_text))
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => value_text(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
