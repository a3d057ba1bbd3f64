//! Error types for flotilla-renderer.

use thiserror::Error;

/// All errors that can arise from rendering a document tree.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Two entries of one mapping share a key.
    #[error("duplicate mapping key '{key}' at {path}")]
    DuplicateKey { key: String, path: String },

    /// A key that cannot be written on a single line.
    #[error("invalid mapping key {key:?} at {path}: {reason}")]
    InvalidKey {
        key: String,
        path: String,
        reason: &'static str,
    },

    /// Rendered text failed to parse back as YAML.
    #[error("rendered document is not valid YAML: {0}")]
    Reparse(#[from] serde_yaml::Error),

    /// Rendered text parses, but not to the data the tree describes.
    #[error("rendered document does not match the document tree")]
    ShapeMismatch,
}
