//! Orchestrator: discover, render once, and publish to every repository.
//!
//! A failure in one repository is logged and recorded; the run moves on to
//! the next. Only an unreadable scan root or a broken render aborts the run,
//! since neither can succeed for any repository.

use std::fmt;
use std::path::Path;

use flotilla_core::{BranchName, RepositoryRecord, Settings};
use flotilla_detector::scan_repositories;
use flotilla_renderer::render_workflow;

use crate::diff::differs;
use crate::publisher::{PublishOutcome, Publisher};
use crate::vcs::Git;
use crate::SyncError;

/// Whether to touch repositories at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Run the full publish sequence.
    #[default]
    Publish,
    /// Compare against the working tree only; no git, no writes.
    DryRun,
}

/// Per-repository result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Published { branch: BranchName },
    NoChanges,
    /// Dry run: the document on disk differs from the rendered one.
    WouldUpdate,
    /// Dry run: the document on disk is already current.
    UpToDate,
    /// Rendered message of the error that stopped this repository.
    Failed { error: String },
}

impl RepoOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RepoOutcome::Failed { .. })
    }
}

impl fmt::Display for RepoOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoOutcome::Published { branch } => write!(f, "published {branch}"),
            RepoOutcome::NoChanges => f.write_str("no changes"),
            RepoOutcome::WouldUpdate => f.write_str("would update"),
            RepoOutcome::UpToDate => f.write_str("up to date"),
            RepoOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub record: RepositoryRecord,
    pub outcome: RepoOutcome,
}

/// Summary of a whole run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub repos: Vec<RepoReport>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &RepoReport> {
        self.repos.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Run the pipeline over every repository under `root`.
pub fn run(
    root: &Path,
    settings: &Settings,
    git: &dyn Git,
    mode: SyncMode,
) -> Result<RunReport, SyncError> {
    let repos = scan_repositories(root, &settings.scan)?;
    tracing::info!(root = %root.display(), count = repos.len(), "discovered repositories");

    let document = render_workflow(&settings.workflow)?;
    let publisher = Publisher::new(git, &settings.git, &settings.workflow.path);

    let mut report = RunReport::default();
    for record in repos {
        tracing::info!(
            repo = %record.path.display(),
            version_ref = %record.version_ref,
            "processing repository"
        );

        let outcome = match sync_one(&record, settings, &publisher, &document, mode) {
            Ok(outcome) => {
                tracing::info!(repo = %record.name(), "{outcome}");
                outcome
            }
            Err(err) => {
                tracing::error!(repo = %record.name(), "{err}");
                RepoOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };
        report.repos.push(RepoReport { record, outcome });
    }

    Ok(report)
}

fn sync_one(
    record: &RepositoryRecord,
    settings: &Settings,
    publisher: &Publisher<'_>,
    document: &str,
    mode: SyncMode,
) -> Result<RepoOutcome, SyncError> {
    match mode {
        SyncMode::DryRun => {
            let target = record.path.join(&settings.workflow.path);
            if differs(&target, document)? {
                Ok(RepoOutcome::WouldUpdate)
            } else {
                Ok(RepoOutcome::UpToDate)
            }
        }
        SyncMode::Publish => {
            let git = &settings.git;
            let branch = BranchName::now(&git.branch_prefix, &git.branch_timestamp)?;
            match publisher.publish(&record.path, document, &branch)? {
                PublishOutcome::Published { branch } => Ok(RepoOutcome::Published { branch }),
                PublishOutcome::NoChanges => Ok(RepoOutcome::NoChanges),
            }
        }
    }
}
