//! `flotilla sync [ROOT]`: render once and publish to every repository.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use flotilla_core::Settings;
use flotilla_sync::{pipeline, GitCli, RepoOutcome, RunReport, SyncMode};

use super::DEFAULT_ROOT;

/// Arguments for `flotilla sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory whose immediate subdirectories are scanned.
    #[arg(default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Compare against each working tree without running git or writing files.
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero if any repository fails.
    #[arg(long)]
    pub strict: bool,
}

impl SyncArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let mode = if self.dry_run {
            SyncMode::DryRun
        } else {
            SyncMode::Publish
        };
        let git = GitCli::new(&settings.git.program);
        tracing::info!(root = %self.root.display(), ?mode, "starting sync");

        let report = pipeline::run(&self.root, settings, &git, mode)
            .with_context(|| format!("sync failed for {}", self.root.display()))?;
        print_report(&report, self.dry_run);

        let failed = report.failures().count();
        if failed > 0 {
            tracing::warn!(failed, total = report.repos.len(), "some repositories failed");
        }
        if self.strict && failed > 0 {
            bail!("{failed} of {} repositories failed", report.repos.len());
        }
        Ok(())
    }
}

fn print_report(report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    if report.repos.is_empty() {
        println!("{prefix}No repositories found.");
        return;
    }

    for repo in &report.repos {
        let marker = match &repo.outcome {
            RepoOutcome::Published { .. } => "✎".green(),
            RepoOutcome::WouldUpdate => "~".yellow(),
            RepoOutcome::NoChanges | RepoOutcome::UpToDate => "·".bright_black(),
            RepoOutcome::Failed { .. } => "✗".red(),
        };
        println!("{prefix}{marker} {}: {}", repo.record.name(), repo.outcome);
    }

    let failed = report.failures().count();
    println!(
        "{prefix}{} repositories, {} failed",
        report.repos.len(),
        failed
    );
}
