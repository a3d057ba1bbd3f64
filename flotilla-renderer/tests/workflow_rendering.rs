//! Rendered Output tests for the canonical workflow.
//!
//! Expected strings are pinned byte for byte.

use flotilla_core::WorkflowSettings;
use flotilla_renderer::{build_workflow, render_workflow, Renderer};

const CANONICAL: &str = r#"---
name: mcvs-golang-action-taskfile-remote-url-ref-updater
"on":
  schedule:
    - cron: "42 6 * * *"
permissions:
  contents: write
  pull-requests: write
jobs:
  mcvs-golang-action-taskfile-remote-url-ref-updater:
    runs-on: ubuntu-24.04
    steps:
      # yamllint disable rule:line-length
      - uses: schubergphilis/mcvs-golang-action-taskfile-remote-url-ref-updater@v0.1.2
      # yamllint enable rule:line-length
"#;

const RAW: &str = r#"name: mcvs-golang-action-taskfile-remote-url-ref-updater
"on":
  schedule:
    - cron: "42 6 * * *"
permissions:
  contents: write
  pull-requests: write
jobs:
  mcvs-golang-action-taskfile-remote-url-ref-updater:
    runs-on: ubuntu-24.04
    steps:

      # yamllint disable rule:line-length
      - uses: schubergphilis/mcvs-golang-action-taskfile-remote-url-ref-updater@v0.1.2

# yamllint enable rule:line-length
"#;

#[test]
fn canonical_workflow_renders_exactly() {
    let out = render_workflow(&WorkflowSettings::default()).expect("render");
    assert_eq!(out, CANONICAL);
}

#[test]
fn raw_serialization_carries_the_artifacts_the_fixer_repairs() {
    let settings = WorkflowSettings::default();
    let raw = Renderer::from_settings(&settings)
        .serialize(&build_workflow(&settings))
        .expect("serialize");
    assert_eq!(raw, RAW);
}

#[test]
fn rendering_twice_is_byte_identical() {
    let settings = WorkflowSettings::default();
    let a = render_workflow(&settings).expect("first");
    let b = render_workflow(&settings).expect("second");
    assert_eq!(a, b);
}

#[test]
fn top_level_keys_keep_builder_order() {
    let out = render_workflow(&WorkflowSettings::default()).expect("render");
    let top: Vec<&str> = out
        .lines()
        .skip(1)
        .filter(|l| !l.starts_with(' ') && !l.starts_with('#'))
        .map(|l| l.split(':').next().unwrap_or_default())
        .collect();
    assert_eq!(top, ["name", "\"on\"", "permissions", "jobs"]);
}

#[test]
fn trigger_key_is_quoted_even_with_other_settings() {
    let settings = WorkflowSettings {
        cron: "0 3 * * 1".to_string(),
        ..WorkflowSettings::default()
    };
    let out = render_workflow(&settings).expect("render");
    assert!(out.contains("\n\"on\":\n"), "{out}");
    assert!(out.contains("- cron: \"0 3 * * 1\""), "{out}");
}

#[test]
fn rendered_output_parses_to_the_expected_data() {
    let out = render_workflow(&WorkflowSettings::default()).expect("render");
    let value: serde_yaml::Value = serde_yaml::from_str(&out).expect("parse");
    assert_eq!(
        value["jobs"]["mcvs-golang-action-taskfile-remote-url-ref-updater"]["steps"][0]["uses"]
            .as_str(),
        Some("schubergphilis/mcvs-golang-action-taskfile-remote-url-ref-updater@v0.1.2")
    );
    assert_eq!(value["on"]["schedule"][0]["cron"].as_str(), Some("42 6 * * *"));
    assert_eq!(value["permissions"]["pull-requests"].as_str(), Some("write"));
}
