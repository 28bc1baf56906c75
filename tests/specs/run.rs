//! Behavioral specs for the run command.
//!
//! Tests that storyreport correctly handles:
//! - Converting Cucumber JSON into a result and writing every configured report
//! - Exit code 1 when any scenario fails
//! - Missing config and invalid config (exit code 2)
//! - Unreadable Cucumber reports becoming a failed result

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

const STAMP: &str = "2026-01-15T10-30-00-000Z";

fn run_with(temp: &Project, report: &str) -> CliBuilder {
    cli("run")
        .pwd(temp.path())
        .args(&["--cucumber-json"])
        .arg_path(fixture(report))
}

#[test]
fn passing_run_writes_configured_reports() {
    let temp = Project::suite("login-v1");

    run_with(&temp, "cucumber/login.json")
        .passes()
        .stdout_has(format!("login-v1-{STAMP}-json.json").as_str())
        .stdout_has("login-v1: PASSED (1/1 scenarios passed)");

    assert_eq!(
        temp.list("reports"),
        vec![
            format!("login-v1-{STAMP}-json.json"),
            format!("login-v1-{STAMP}-markdown.md"),
            format!("login-v1-{STAMP}-xml.xml"),
        ]
    );
}

#[test]
fn json_report_carries_scenarios_and_logs() {
    let temp = Project::suite("login-v1");
    run_with(&temp, "cucumber/login.json").passes();

    let json: serde_json::Value =
        serde_json::from_str(&temp.read(format!("reports/login-v1-{STAMP}-json.json"))).unwrap();
    assert_eq!(json["testSuiteId"], "login-v1");
    assert_eq!(json["status"], "passed");
    assert_eq!(json["scenarios"][0]["name"], "Successful login");
    assert_eq!(json["statistics"]["executionTime"], 1500);
    assert_eq!(json["metadata"]["reportGenerated"], "2026-01-15T10:30:00Z");

    let logs = json["metadata"]["logEntries"].as_array().unwrap();
    assert!(
        logs.iter().any(|entry| entry["message"]
            .as_str()
            .is_some_and(|m| m.contains("1/1 scenarios passed"))),
        "log history should be merged into the report: {logs:?}"
    );
}

#[test]
fn failing_scenario_exits_one_and_still_writes_reports() {
    let temp = Project::suite("checkout");

    run_with(&temp, "cucumber/checkout.json")
        .fails()
        .stdout_has("checkout: FAILED (1/2 scenarios passed)");

    let xml = temp.read(format!("reports/checkout-{STAMP}-xml.xml"));
    assert!(xml.contains(r#"failures="1""#), "{xml}");
    assert!(xml.contains("expected &#39;declined&#39; but got &lt;ok&gt;"), "{xml}");
}

#[test]
fn missing_cucumber_report_becomes_failed_result() {
    let temp = Project::suite("login-v1");

    cli("run")
        .pwd(temp.path())
        .args(&["--cucumber-json", "nowhere.json"])
        .fails()
        .stdout_has("login-v1: FAILED (0/1 scenarios passed)");

    let markdown = temp.read(format!("reports/login-v1-{STAMP}-markdown.md"));
    assert!(markdown.contains("### 1. Test Execution"), "{markdown}");
    assert!(markdown.contains("Report file not found"), "{markdown}");
}

#[test]
fn run_without_config_is_a_config_error() {
    let temp = Project::empty();
    run_with(&temp, "cucumber/login.json")
        .exits(2)
        .stderr_has("no storyreport.toml found");
}

#[test]
fn invalid_config_names_the_field() {
    let temp = Project::empty();
    temp.config("testSuiteId = \"login-v1\"\nstepDefinitions = [\"steps/*.ts\"]\n");

    run_with(&temp, "cucumber/login.json")
        .exits(2)
        .stderr_has("featureFiles is required");
}

#[test]
fn unsupported_output_format_is_reported() {
    let temp = Project::suite("login-v1");
    temp.config(
        r#"testSuiteId = "login-v1"
featureFiles = ["features/*.feature"]
stepDefinitions = ["steps/*.ts"]
outputFormats = ["json", "pdf"]
outputDirectory = "reports"
"#,
    );

    run_with(&temp, "cucumber/login.json")
        .exits(2)
        .stderr_has("unsupported format: pdf");
}

#[test]
fn unknown_config_keys_warn() {
    let temp = Project::suite("login-v1");
    temp.config(
        r#"testSuiteId = "login-v1"
featureFiles = ["features/*.feature"]
stepDefinitions = ["steps/*.ts"]
outputDirectory = "reports"
browser = "chromium"
"#,
    );

    run_with(&temp, "cucumber/login.json")
        .passes()
        .stderr_has("unrecognized field `browser`");
}

#[test]
fn config_is_discovered_from_subdirectory() {
    // Output directory resolves against the config file, not the working directory
    let temp = Project::suite("login-v1");
    temp.file("features/.keep", "");

    cli("run")
        .pwd(temp.path().join("features"))
        .args(&["--cucumber-json"])
        .arg_path(fixture("cucumber/login.json"))
        .passes();

    assert_eq!(temp.list("reports").len(), 3);
}
