//! Publisher: moves one repository from "document rendered" to "branch pushed".
//!
//! The sequence is an explicit ordered list of [`Step`]s. Each step either
//! continues, or (only [`Step::DetectChanges`]) ends the run early when the
//! working tree is clean. The first failure aborts the repository and is
//! reported with the step that failed and the tool output.
//!
//! ```text
//! ResetWorkingTree → CheckoutDefaultBranch → PullDefaultBranch → CreateBranch
//!   → WriteDocument → DetectChanges ─┬─ clean → DiscardBranch → NoChanges
//!                                    └─ dirty → StageAll → Commit → Push → Published
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use flotilla_core::{BranchName, GitSettings};

use crate::changes::has_changes;
use crate::error::PathIoError;
use crate::vcs::{Git, GitError};
use crate::writer::write_document;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One stage of the publish sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `git checkout .`: discard unstaged edits to tracked files.
    ResetWorkingTree,
    CheckoutDefaultBranch,
    PullDefaultBranch,
    CreateBranch,
    WriteDocument,
    DetectChanges,
    StageAll,
    Commit,
    Push,
    /// Clean-tree exit: back to the default branch, delete the new one.
    DiscardBranch,
}

impl Step {
    /// The main sequence, in execution order. [`Step::DiscardBranch`] runs
    /// only on the clean-tree exit.
    pub const SEQUENCE: [Step; 9] = [
        Step::ResetWorkingTree,
        Step::CheckoutDefaultBranch,
        Step::PullDefaultBranch,
        Step::CreateBranch,
        Step::WriteDocument,
        Step::DetectChanges,
        Step::StageAll,
        Step::Commit,
        Step::Push,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::ResetWorkingTree => "reset working tree",
            Step::CheckoutDefaultBranch => "checkout default branch",
            Step::PullDefaultBranch => "pull default branch",
            Step::CreateBranch => "create branch",
            Step::WriteDocument => "write workflow",
            Step::DetectChanges => "detect changes",
            Step::StageAll => "stage changes",
            Step::Commit => "commit",
            Step::Push => "push branch",
            Step::DiscardBranch => "discard unused branch",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Errors and outcomes
// ---------------------------------------------------------------------------

/// Why a single step failed.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Io(#[from] PathIoError),
}

/// A failed publish: which repository, which step, and the cause.
#[derive(Debug, Error)]
#[error("{}: {step} failed: {source}", repo.display())]
pub struct PublishError {
    pub repo: PathBuf,
    pub step: Step,
    pub source: StepError,
}

impl PublishError {
    /// Combined tool output of the failing git command, if any.
    pub fn output(&self) -> Option<&str> {
        match &self.source {
            StepError::Git(e) => e.output(),
            StepError::Io(_) => None,
        }
    }
}

/// Successful end states of a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Committed on `branch` and pushed.
    Published { branch: BranchName },
    /// The rendered document matched the default branch; nothing was pushed.
    NoChanges,
}

enum Transition {
    Continue,
    Clean,
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Runs the publish sequence for one repository at a time.
pub struct Publisher<'a> {
    git: &'a dyn Git,
    settings: &'a GitSettings,
    /// Document path relative to the repository root.
    target: &'a Path,
}

struct Run<'r> {
    repo: &'r Path,
    document: &'r str,
    branch: &'r BranchName,
}

impl<'a> Publisher<'a> {
    pub fn new(git: &'a dyn Git, settings: &'a GitSettings, target: &'a Path) -> Self {
        Self {
            git,
            settings,
            target,
        }
    }

    /// Bring `repo` up to date with the default branch, write `document`, and
    /// publish it on `branch` if anything changed.
    pub fn publish(
        &self,
        repo: &Path,
        document: &str,
        branch: &BranchName,
    ) -> Result<PublishOutcome, PublishError> {
        let run = Run {
            repo,
            document,
            branch,
        };

        for step in Step::SEQUENCE {
            if let Transition::Clean = self.execute(step, &run)? {
                self.execute(Step::DiscardBranch, &run)?;
                tracing::info!(repo = %repo.display(), "no changes; skipping commit and push");
                return Ok(PublishOutcome::NoChanges);
            }
        }

        tracing::info!(repo = %repo.display(), branch = %branch, "pushed");
        Ok(PublishOutcome::Published {
            branch: branch.clone(),
        })
    }

    fn execute(&self, step: Step, run: &Run<'_>) -> Result<Transition, PublishError> {
        tracing::debug!(repo = %run.repo.display(), step = %step, "step");
        self.step(step, run).map_err(|source| PublishError {
            repo: run.repo.to_path_buf(),
            step,
            source,
        })
    }

    fn step(&self, step: Step, run: &Run<'_>) -> Result<Transition, StepError> {
        let remote = self.settings.remote.as_str();
        let default = self.settings.default_branch.as_str();
        let branch = run.branch.as_str();
        match step {
            Step::ResetWorkingTree => self.git(run, &["checkout", "."]),
            Step::CheckoutDefaultBranch => self.git(run, &["checkout", default]),
            Step::PullDefaultBranch => self.git(run, &["pull", remote, default]),
            Step::CreateBranch => self.git(run, &["checkout", "-b", branch]),
            Step::WriteDocument => {
                write_document(&run.repo.join(self.target), run.document)?;
                Ok(Transition::Continue)
            }
            Step::DetectChanges => {
                if has_changes(self.git, run.repo)? {
                    Ok(Transition::Continue)
                } else {
                    Ok(Transition::Clean)
                }
            }
            Step::StageAll => self.git(run, &["add", "."]),
            Step::Commit => self.git(run, &["commit", "-m", self.settings.commit_message.as_str()]),
            Step::Push => self.git(run, &["push", remote, branch]),
            Step::DiscardBranch => {
                self.git(run, &["checkout", default])?;
                self.git(run, &["branch", "-D", branch])
            }
        }
    }

    fn git(&self, run: &Run<'_>, args: &[&str]) -> Result<Transition, StepError> {
        self.git.run(run.repo, args)?;
        Ok(Transition::Continue)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::vcs::GitOutput;

    const TARGET: &str = ".github/workflows/w.yml";
    const BRANCH: &str = "update-workflows-20250101-000000";

    /// Records every invocation; fails the first command whose args start
    /// with `fail_on`, and reports `status` for `git status --porcelain`.
    #[derive(Default)]
    struct FakeGit {
        calls: RefCell<Vec<String>>,
        status: String,
        fail_on: Option<&'static str>,
    }

    impl FakeGit {
        fn dirty() -> Self {
            Self {
                status: "?? .github/\n".to_string(),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl Git for FakeGit {
        fn run(&self, _dir: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
            let command = args.join(" ");
            self.calls.borrow_mut().push(command.clone());
            if self.fail_on.is_some_and(|prefix| command.starts_with(prefix)) {
                return Err(GitError::Failed {
                    command: format!("git {command}"),
                    status: "exit status: 1".to_string(),
                    output: "fatal: simulated failure\n".to_string(),
                });
            }
            let stdout = if command == "status --porcelain" {
                self.status.clone()
            } else {
                String::new()
            };
            Ok(GitOutput {
                stdout,
                stderr: String::new(),
            })
        }
    }

    fn publish(git: &FakeGit, repo: &Path) -> Result<PublishOutcome, PublishError> {
        let settings = GitSettings::default();
        Publisher::new(git, &settings, Path::new(TARGET)).publish(
            repo,
            "name: w\n",
            &BranchName::from(BRANCH),
        )
    }

    #[test]
    fn dirty_tree_runs_full_sequence_in_order() {
        let repo = TempDir::new().unwrap();
        let git = FakeGit::dirty();

        let outcome = publish(&git, repo.path()).expect("publish");
        assert_eq!(
            outcome,
            PublishOutcome::Published {
                branch: BranchName::from(BRANCH)
            }
        );
        assert_eq!(
            git.calls(),
            [
                "checkout .".to_string(),
                "checkout main".to_string(),
                "pull origin main".to_string(),
                format!("checkout -b {BRANCH}"),
                "status --porcelain".to_string(),
                "add .".to_string(),
                "commit -m build: update remote_url_ref in taskfile daily".to_string(),
                format!("push origin {BRANCH}"),
            ]
        );
        assert_eq!(fs::read_to_string(repo.path().join(TARGET)).unwrap(), "name: w\n");
    }

    #[test]
    fn clean_tree_discards_branch_and_skips_commit() {
        let repo = TempDir::new().unwrap();
        let git = FakeGit::default();

        let outcome = publish(&git, repo.path()).expect("publish");
        assert_eq!(outcome, PublishOutcome::NoChanges);

        let calls = git.calls();
        assert_eq!(
            &calls[4..],
            [
                "status --porcelain".to_string(),
                "checkout main".to_string(),
                format!("branch -D {BRANCH}"),
            ]
        );
        assert!(!calls.iter().any(|c| c.starts_with("commit") || c.starts_with("push")));
    }

    #[rstest]
    #[case::reset("checkout .", Step::ResetWorkingTree, 1)]
    #[case::pull("pull", Step::PullDefaultBranch, 3)]
    #[case::branch("checkout -b", Step::CreateBranch, 4)]
    #[case::status("status", Step::DetectChanges, 5)]
    #[case::commit("commit", Step::Commit, 7)]
    #[case::push("push", Step::Push, 8)]
    fn first_failure_aborts_with_step_and_output(
        #[case] fail_on: &'static str,
        #[case] step: Step,
        #[case] calls_made: usize,
    ) {
        let repo = TempDir::new().unwrap();
        let git = FakeGit {
            fail_on: Some(fail_on),
            ..FakeGit::dirty()
        };

        let err = publish(&git, repo.path()).unwrap_err();
        assert_eq!(err.step, step);
        assert_eq!(err.repo, repo.path());
        assert_eq!(err.output(), Some("fatal: simulated failure\n"));
        assert!(err.to_string().contains(step.name()), "got: {err}");
        assert_eq!(git.calls().len(), calls_made, "no steps after the failure");
    }

    #[test]
    fn discard_failure_is_reported_as_discard_step() {
        let repo = TempDir::new().unwrap();
        let git = FakeGit {
            fail_on: Some("branch -D"),
            ..FakeGit::default()
        };
        let err = publish(&git, repo.path()).unwrap_err();
        assert_eq!(err.step, Step::DiscardBranch);
    }

    #[test]
    fn write_failure_is_an_io_step_error() {
        let repo = TempDir::new().unwrap();
        fs::write(repo.path().join(".github"), "not a directory").unwrap();
        let git = FakeGit::dirty();

        let err = publish(&git, repo.path()).unwrap_err();
        assert_eq!(err.step, Step::WriteDocument);
        assert!(matches!(err.source, StepError::Io(_)));
        assert!(err.output().is_none());
        assert_eq!(git.calls().len(), 4);
    }

    #[test]
    fn custom_remote_and_branch_are_used() {
        let repo = TempDir::new().unwrap();
        let git = FakeGit::dirty();
        let settings = GitSettings {
            remote: "upstream".to_string(),
            default_branch: "trunk".to_string(),
            ..GitSettings::default()
        };
        Publisher::new(&git, &settings, Path::new(TARGET))
            .publish(repo.path(), "x: y\n", &BranchName::from("b"))
            .expect("publish");
        let calls = git.calls();
        assert_eq!(calls[1], "checkout trunk");
        assert_eq!(calls[2], "pull upstream trunk");
        assert_eq!(calls.last().map(String::as_str), Some("push upstream b"));
    }
}
