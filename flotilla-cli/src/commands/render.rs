//! `flotilla render`: print the workflow document.

use anyhow::{Context, Result};
use clap::Args;

use flotilla_core::Settings;
use flotilla_renderer::render_workflow;

/// Arguments for `flotilla render`.
#[derive(Args, Debug)]
pub struct RenderArgs {}

impl RenderArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let document = render_workflow(&settings.workflow).context("failed to render workflow")?;
        print!("{document}");
        Ok(())
    }
}
