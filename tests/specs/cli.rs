//! Behavioral specs for top-level CLI behavior.
//!
//! Tests that storyreport correctly handles:
//! - Bare invocation (shows help)
//! - help and version flags
//! - Unknown commands and missing arguments (exit code 2)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn bare_invocation_shows_help() {
    storyreport_cmd()
        .assert()
        .success()
        .stdout(predicates::str::contains("Usage:"));
}

#[test]
fn help_lists_every_command() {
    let assert = storyreport_cmd().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for command in ["run", "render", "metrics", "validate"] {
        assert!(stdout.contains(command), "help should list {command}:\n{stdout}");
    }
}

#[test]
fn short_version_flag_works() {
    storyreport_cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_command_fails() {
    storyreport_cmd()
        .arg("unknown")
        .assert()
        .code(2)
        .stderr(predicates::str::is_match(r"(?i)(unrecognized|unknown)").unwrap());
}

#[test]
fn run_requires_cucumber_reports() {
    storyreport_cmd()
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("--cucumber-json"));
}

#[test]
fn explicit_config_must_exist() {
    let temp = Project::empty();
    cli("render")
        .pwd(temp.path())
        .args(&["-C", "missing.toml", "--input"])
        .arg_path(fixture("results/login-passed.json"))
        .exits(2)
        .stderr_has("config file not found");
}

#[test]
fn config_path_can_come_from_environment() {
    let temp = Project::empty();
    cli("render")
        .pwd(temp.path())
        .env("STORYREPORT_CONFIG", "elsewhere.toml")
        .args(&["--input"])
        .arg_path(fixture("results/login-passed.json"))
        .exits(2)
        .stderr_has("elsewhere.toml");
}
