//! Error types for flotilla-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Underlying I/O failure (permission denied, not a file, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested settings file does not exist.
    #[error("settings file not found at {path}")]
    NotFound { path: PathBuf },

    /// A value parsed but is not usable.
    #[error("invalid settings at {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: BranchNameError,
    },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.flotilla/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

/// Errors from deriving a branch name.
#[derive(Debug, Error)]
pub enum BranchNameError {
    /// The timestamp pattern contains a specifier chrono does not know.
    #[error("invalid branch timestamp format '{format}'")]
    InvalidTimestampFormat { format: String },
}
