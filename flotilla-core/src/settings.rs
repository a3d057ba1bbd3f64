//! Layered settings.
//!
//! # Storage layout
//!
//! ```text
//! ~/.flotilla/
//!   config.yaml   (optional: every key falls back to its default)
//! ```
//!
//! # API pattern
//!
//! - `load_at(home)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`
//! - `load_from(path)`: explicit file, must exist
//!
//! Tests must NEVER call the no-arg wrapper; always use `_at` or `load_from`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::types::validate_timestamp_format;

pub const DEFAULT_WORKFLOW_NAME: &str = "mcvs-golang-action-taskfile-remote-url-ref-updater";
pub const DEFAULT_WORKFLOW_PATH: &str =
    ".github/workflows/mcvs-golang-action-taskfile-remote-url-ref-updater.yml";
pub const DEFAULT_ACTION: &str =
    "schubergphilis/mcvs-golang-action-taskfile-remote-url-ref-updater@v0.1.2";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Root of `config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub scan: ScanSettings,
    pub workflow: WorkflowSettings,
    pub git: GitSettings,
}

/// Which repositories participate and where their version reference lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSettings {
    /// Build-configuration file, relative to each repository root.
    pub config_file: PathBuf,
    /// Key looked up under the file's `vars` mapping.
    pub version_key: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("Taskfile.yml"),
            version_key: "REMOTE_URL_REF".to_string(),
        }
    }
}

/// Shape of the canonical workflow document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowSettings {
    pub name: String,
    pub job_id: String,
    /// Target file, relative to each repository root.
    pub path: PathBuf,
    pub cron: String,
    pub runs_on: String,
    /// `uses:` reference of the single step.
    pub action: String,
    /// Root keys rendered double-quoted regardless of content.
    pub quoted_keys: Vec<String>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_WORKFLOW_NAME.to_string(),
            job_id: DEFAULT_WORKFLOW_NAME.to_string(),
            path: PathBuf::from(DEFAULT_WORKFLOW_PATH),
            cron: "42 6 * * *".to_string(),
            runs_on: "ubuntu-24.04".to_string(),
            action: DEFAULT_ACTION.to_string(),
            quoted_keys: vec!["on".to_string()],
        }
    }
}

/// Version-control conventions used by the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Executable invoked for every version-control step.
    pub program: PathBuf,
    pub remote: String,
    pub default_branch: String,
    pub branch_prefix: String,
    /// chrono `strftime` pattern appended to `branch_prefix`.
    pub branch_timestamp: String,
    pub commit_message: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            remote: "origin".to_string(),
            default_branch: "main".to_string(),
            branch_prefix: "update-workflows-".to_string(),
            branch_timestamp: "%Y%m%d-%H%M%S".to_string(),
            commit_message: "build: update remote_url_ref in taskfile daily".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// `<home>/.flotilla/config.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".flotilla").join("config.yaml")
}

/// Load settings from `<home>/.flotilla/config.yaml`.
///
/// A missing file yields [`Settings::default`].
pub fn load_at(home: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path_at(home);
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_from(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<Settings, SettingsError> {
    load_at(&home()?)
}

/// Load settings from an explicit file.
///
/// Returns `SettingsError::NotFound` if absent, `SettingsError::Parse`
/// (with path + line context) if malformed or carrying unknown keys.
pub fn load_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        return Err(SettingsError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let settings: Settings =
        serde_yaml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_timestamp_format(&settings.git.branch_timestamp).map_err(|source| {
        SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(settings)
}

fn home() -> Result<PathBuf, SettingsError> {
    dirs::home_dir().ok_or(SettingsError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
