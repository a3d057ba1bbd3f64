//! # flotilla-renderer
//!
//! Document Model, workflow builder, block-style YAML emitter, and the
//! textual comment fixer.
//!
//! ## Usage
//!
//! ```rust
//! use flotilla_core::WorkflowSettings;
//! use flotilla_renderer::render_workflow;
//!
//! let yaml = render_workflow(&WorkflowSettings::default()).unwrap();
//! assert!(yaml.starts_with("---\n"));
//! assert!(yaml.contains("\"on\":"));
//! ```

pub mod engine;
pub mod error;
pub mod fixup;
pub mod node;
pub mod workflow;

pub use engine::{Renderer, DOCUMENT_START};
pub use error::RenderError;
pub use fixup::fix_misplaced_comments;
pub use node::{Entry, Node, NodeKind, ScalarStyle};
pub use workflow::{build_workflow, render_workflow};
