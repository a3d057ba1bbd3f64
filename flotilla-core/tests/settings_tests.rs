//! Settings load, error-message, and override tests.

use std::fs;
use std::path::PathBuf;

use assert_fs::prelude::*;
use flotilla_core::{settings, SettingsError, Settings};
use predicates::prelude::predicate;
use rstest::rstest;

// ---------------------------------------------------------------------------
// 1. Missing files
// ---------------------------------------------------------------------------

#[test]
fn load_at_without_file_returns_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let s = settings::load_at(home.path()).expect("load");
    assert_eq!(s, Settings::default());
}

#[test]
fn load_from_missing_file_returns_not_found() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = home.path().join("nope.yaml");
    let err = settings::load_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.yaml"));
}

// ---------------------------------------------------------------------------
// 2. Parse errors
// ---------------------------------------------------------------------------

#[rstest]
#[case::corrupt(": : corrupt : yaml : !!!\n  - broken: [unclosed")]
#[case::unknown_key("git:\n  defualt_branch: main\n")]
#[case::wrong_type("scan: 42\n")]
fn bad_settings_return_parse_error_with_path(#[case] body: &str) {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".flotilla/config.yaml");
    file.write_str(body).expect("write");

    let err = settings::load_at(home.path()).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }), "got: {err}");
    assert!(
        err.to_string().contains("config.yaml"),
        "must contain file path, got: {err}"
    );
}

// ---------------------------------------------------------------------------
// 3. Overrides
// ---------------------------------------------------------------------------

#[test]
fn overrides_are_applied_section_by_section() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".flotilla/config.yaml");
    file.write_str(
        concat!(
            "scan:\n  config_file: build/Taskfile.yaml\n",
            "workflow:\n  cron: \"0 3 * * 1\"\n",
            "git:\n  remote: upstream\n",
        ),
    )
    .expect("write");
    file.assert(predicate::path::exists());

    let s = settings::load_at(home.path()).expect("load");
    assert_eq!(s.scan.config_file, PathBuf::from("build/Taskfile.yaml"));
    assert_eq!(s.scan.version_key, "REMOTE_URL_REF");
    assert_eq!(s.workflow.cron, "0 3 * * 1");
    assert_eq!(s.workflow.runs_on, "ubuntu-24.04");
    assert_eq!(s.git.remote, "upstream");
    assert_eq!(s.git.default_branch, "main");
}

#[test]
fn empty_file_yields_defaults() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let path = dir.path().join("flotilla.yaml");
    fs::write(&path, "\n").expect("write");
    let s = settings::load_from(&path).expect("load");
    assert_eq!(s, Settings::default());
}

#[test]
fn unknown_timestamp_specifier_is_rejected_on_load() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".flotilla/config.yaml");
    file.write_str("git:\n  branch_timestamp: \"%Q\"\n").expect("write");

    let err = settings::load_at(home.path()).unwrap_err();
    assert!(matches!(err, SettingsError::Invalid { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"), "got: {err}");
}
