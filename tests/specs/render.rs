//! Behavioral specs for the render command.
//!
//! Tests that storyreport correctly handles:
//! - Rendering a saved result into the requested formats
//! - Report options from a discovered config
//! - Rejecting structurally invalid results (exit code 2)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

fn render(temp: &Project, result: &str) -> CliBuilder {
    cli("render")
        .pwd(temp.path())
        .args(&["--input"])
        .arg_path(fixture(result))
}

#[test]
fn renders_every_requested_format() {
    let temp = Project::empty();

    render(&temp, "results/login-passed.json")
        .args(&["-f", "html", "-f", "csv", "-f", "md", "-d", "out"])
        .passes();

    let files = temp.list("out");
    assert_eq!(files.len(), 3, "{files:?}");
    assert!(files.iter().any(|f| f.ends_with("-html.html")));
    assert!(files.iter().any(|f| f.ends_with("-csv.csv")));
    assert!(files.iter().any(|f| f.ends_with("-markdown.md")));
    assert!(files.iter().all(|f| f.starts_with("login-v1-")));
}

#[test]
fn csv_report_lists_scenarios() {
    let temp = Project::empty();
    render(&temp, "results/checkout-failed.json")
        .args(&["-f", "csv", "-d", "out"])
        .passes();

    let name = temp.list("out").remove(0);
    let csv = temp.read(format!("out/{name}"));
    similar_asserts::assert_eq!(
        csv,
        "scenario_name,status,duration_ms,steps_total,steps_passed,steps_failed,error_message\n\
         Pay by card,passed,1200,2,2,0,\n\
         Pay with an expired card,failed,800,2,1,1,expected 'declined' but got <ok>"
    );
}

#[test]
fn config_supplies_report_options() {
    let temp = Project::empty();
    temp.config(
        r#"outputFormats = ["html"]
outputDirectory = "site"

[reportOptions]
title = "Nightly <login> run"
generatedAt = "2026-01-15T10:30:00Z"

[reportOptions.html]
theme = "dark"
"#,
    );

    render(&temp, "results/login-passed.json").passes();

    let html = temp.read("site/login-v1-2026-01-15T10-30-00-000Z-html.html");
    assert!(html.contains("<title>Nightly &lt;login&gt; run</title>"), "{html}");
    assert!(html.contains("dark"), "{html}");
}

#[test]
fn defaults_to_json_in_test_results() {
    let temp = Project::empty();
    render(&temp, "results/login-passed.json").passes();

    let files = temp.list("test-results");
    assert_eq!(files.len(), 1);
    let json: serde_json::Value =
        serde_json::from_str(&temp.read(format!("test-results/{}", files[0]))).unwrap();
    assert_eq!(json["testSuiteId"], "login-v1");
    assert_eq!(json["totalScenarios"], 1);
}

#[test]
fn invalid_result_is_rejected() {
    let temp = Project::empty();
    render(&temp, "results/missing-status.json")
        .exits(2)
        .stderr_has("invalid test result: status is required");
}

#[test]
fn unsupported_format_is_rejected() {
    let temp = Project::empty();
    render(&temp, "results/login-passed.json")
        .args(&["-f", "pdf"])
        .exits(2)
        .stderr_has("unsupported format: pdf");
}

#[test]
fn missing_input_is_an_io_error() {
    let temp = Project::empty();
    cli("render")
        .pwd(temp.path())
        .args(&["--input", "absent.json"])
        .exits(3)
        .stderr_has("absent.json");
}
