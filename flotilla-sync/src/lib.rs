//! # flotilla-sync
//!
//! Publishes the rendered workflow into every discovered repository.
//!
//! [`pipeline::run`] scans a root directory, renders the document once, and
//! drives a [`Publisher`] through each repository. All git access goes through
//! the [`Git`] trait; [`GitCli`] is the real implementation.

pub mod changes;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod publisher;
pub mod vcs;
pub mod writer;

pub use diff::{diff_all, diff_document, FileDiff, RepoDiff};
pub use error::{PathIoError, SyncError};
pub use pipeline::{run, RepoOutcome, RepoReport, RunReport, SyncMode};
pub use publisher::{PublishError, PublishOutcome, Publisher, Step, StepError};
pub use vcs::{Git, GitCli, GitError, GitOutput};
pub use writer::write_document;
