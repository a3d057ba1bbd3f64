//! Subcommand implementations.

pub mod diff;
pub mod render;
pub mod scan;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};

use flotilla_core::{settings, Settings};

/// Scan root used when none is given on the command line.
pub const DEFAULT_ROOT: &str = "..";

/// Settings from `--config` when given, otherwise from the home directory.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            settings::load_from(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))
        }
        None => {
            tracing::debug!("loading settings from home directory");
            settings::load().context("failed to load settings")
        }
    }
}
