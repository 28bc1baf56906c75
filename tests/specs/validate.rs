//! Behavioral specs for the validate command.
//!
//! Tests that storyreport correctly handles:
//! - A PASS/FAIL line per criterion plus an overall verdict
//! - Exit code 1 when any criterion fails
//! - NO_COLOR and COLOR

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn validate(result: &str) -> CliBuilder {
    let temp = Project::empty();
    cli("validate")
        .in_project(temp)
        .args(&["--input"])
        .arg_path(fixture(result))
        .args(&["--root"])
        .arg_path(fixture("metrics/healthy"))
}

#[test]
fn healthy_metrics_and_passing_result_pass() {
    validate("results/login-passed.json")
        .passes()
        .stdout_has("PASS  System Test Class Coverage: 90.00% (threshold: 80%)")
        .stdout_has("PASS  Code Duplication: 2.00% (threshold: 5%)")
        .stdout_has("PASS 6/6 criteria passed")
        .stdout_lacks("FAIL");
}

#[test]
fn failed_scenarios_fail_execution_criterion() {
    validate("results/checkout-failed.json")
        .fails()
        .stdout_has("FAIL  Test Execution Success: 50.00% (threshold: 100%)")
        .stdout_has("FAIL 5/6 criteria passed");
}

#[test]
fn missing_metrics_fail_coverage_criteria() {
    let temp = Project::empty();
    cli("validate")
        .pwd(temp.path())
        .args(&["--input"])
        .arg_path(fixture("results/login-passed.json"))
        .fails()
        .stdout_has("FAIL  Branch Coverage: 0.00% (threshold: 80%)")
        .stdout_has("PASS  Test Execution Success")
        .stdout_has("FAIL 2/6 criteria passed");
}

#[test]
fn no_color_output_has_no_escape_codes() {
    validate("results/login-passed.json")
        .passes()
        .stdout_lacks("\x1b[");
}

#[test]
fn color_env_forces_escape_codes() {
    validate("results/login-passed.json")
        .env_remove("NO_COLOR")
        .env("COLOR", "1")
        .passes()
        .stdout_has("\x1b[");
}
