//! Workflow Document Builder.
//!
//! Builds the canonical workflow as a [`Node`] tree: a scheduled trigger,
//! write permissions for contents and pull requests, and one job with one
//! step. The step's `uses:` line exceeds the line-length lint, so the step is
//! bracketed by comments disabling and re-enabling that rule.

use flotilla_core::WorkflowSettings;

use crate::engine::Renderer;
use crate::error::RenderError;
use crate::node::Node;

pub const LINE_LENGTH_DISABLE_COMMENT: &str = "yamllint disable rule:line-length";
pub const LINE_LENGTH_ENABLE_COMMENT: &str = "yamllint enable rule:line-length";

/// Build the workflow tree. Pure; same settings, same tree.
pub fn build_workflow(settings: &WorkflowSettings) -> Node {
    let trigger = Node::mapping().entry(
        "schedule",
        Node::sequence([Node::mapping().entry("cron", Node::quoted(&settings.cron))]),
    );

    let permissions = Node::mapping()
        .entry("contents", Node::scalar("write"))
        .entry("pull-requests", Node::scalar("write"));

    let step = Node::mapping()
        .entry("uses", Node::scalar(&settings.action))
        .with_leading_comment(LINE_LENGTH_DISABLE_COMMENT)
        .with_trailing_comment(LINE_LENGTH_ENABLE_COMMENT);

    let job = Node::mapping()
        .entry("runs-on", Node::scalar(&settings.runs_on))
        .entry("steps", Node::sequence([step]));

    Node::mapping()
        .entry("name", Node::scalar(&settings.name))
        .entry("on", trigger)
        .entry("permissions", permissions)
        .entry("jobs", Node::mapping().entry(settings.job_id.clone(), job))
}

/// Build, serialize, and fix the workflow: the Rendered Output.
pub fn render_workflow(settings: &WorkflowSettings) -> Result<String, RenderError> {
    Renderer::from_settings(settings).render(&build_workflow(settings))
}
