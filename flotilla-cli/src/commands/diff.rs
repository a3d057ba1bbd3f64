//! `flotilla diff [ROOT]`: show unified diffs for what sync would write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use flotilla_core::Settings;
use flotilla_sync::diff_all;

use super::DEFAULT_ROOT;

/// Arguments for `flotilla diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Directory whose immediate subdirectories are scanned.
    #[arg(default_value = DEFAULT_ROOT)]
    pub root: PathBuf,
}

impl DiffArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let results = diff_all(&self.root, settings)
            .with_context(|| format!("diff failed for {}", self.root.display()))?;

        let mut any = false;
        for result in results {
            let Some(diff) = result.diff else { continue };
            any = true;
            println!("# {}", result.record.name());
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        if !any {
            println!("No differences under {}.", self.root.display());
        }
        Ok(())
    }
}
