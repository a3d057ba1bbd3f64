//! `flotilla scan [ROOT]`: discovery only.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use flotilla_core::{RepositoryRecord, Settings};
use flotilla_detector::scan_repositories;

use super::DEFAULT_ROOT;

/// Arguments for `flotilla scan`.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory whose immediate subdirectories are scanned.
    #[arg(default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let records = scan_repositories(&self.root, &settings.scan)
            .with_context(|| format!("scan failed for {}", self.root.display()))?;

        if self.json {
            print_json(&records)
        } else {
            print_table(&self.root, &records, &settings.scan.version_key);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct RepositoryJson<'a> {
    name: String,
    path: &'a std::path::Path,
    version_ref: &'a str,
}

#[derive(Tabled)]
struct RepositoryRow {
    #[tabled(rename = "repository")]
    name: String,
    #[tabled(rename = "version ref")]
    version_ref: String,
    #[tabled(rename = "path")]
    path: String,
}

fn print_json(records: &[RepositoryRecord]) -> Result<()> {
    let payload: Vec<_> = records
        .iter()
        .map(|r| RepositoryJson {
            name: r.name(),
            path: &r.path,
            version_ref: &r.version_ref,
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize scan JSON")?
    );
    Ok(())
}

fn print_table(root: &std::path::Path, records: &[RepositoryRecord], key: &str) {
    println!(
        "{} repositories under {} | key {}",
        records.len(),
        root.display(),
        key.bold()
    );
    if records.is_empty() {
        return;
    }

    let rows: Vec<RepositoryRow> = records
        .iter()
        .map(|r| RepositoryRow {
            name: r.name(),
            version_ref: if r.version_ref.is_empty() {
                "(none)".to_string()
            } else {
                r.version_ref.clone()
            },
            path: r.path.display().to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
