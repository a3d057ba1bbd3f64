//! Error types for flotilla-sync.

use std::path::PathBuf;

use thiserror::Error;

use flotilla_core::BranchNameError;
use flotilla_detector::ScanError;
use flotilla_renderer::RenderError;

use crate::publisher::PublishError;

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Discovery could not list the scan root.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// The branch name could not be derived from settings.
    #[error("branch name error: {0}")]
    Branch(#[from] BranchNameError),

    /// An I/O error, with annotated path for context.
    #[error(transparent)]
    Io(#[from] PathIoError),

    /// A publish step failed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// An I/O failure annotated with the path it happened at.
#[derive(Debug, Error)]
#[error("I/O error at {path}: {source}")]
pub struct PathIoError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Convenience constructor for [`PathIoError`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PathIoError {
    PathIoError {
        path: path.into(),
        source,
    }
}
