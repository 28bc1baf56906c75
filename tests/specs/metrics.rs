//! Behavioral specs for the metrics command.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::prelude::*;

#[test]
fn aggregates_every_theme_under_root() {
    let temp = Project::empty();
    let json = cli("metrics")
        .pwd(temp.path())
        .args(&["--root"])
        .arg_path(fixture("metrics/healthy"))
        .passes()
        .json();

    let names: Vec<&str> = json["themes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["portal", "shop"]);

    let aggregate = &json["aggregatedMetrics"];
    assert_eq!(aggregate["systemTest"]["class"]["covered"], 90);
    assert_eq!(aggregate["overall"]["line"]["covered"], 186);
    assert_eq!(aggregate["overall"]["line"]["total"], 200);
    assert_eq!(json["duplication"]["duplicatedLines"], 4);
    assert_eq!(json["passCriteria"]["duplicationThreshold"]["met"], true);
}

#[test]
fn empty_root_yields_empty_snapshot() {
    let temp = Project::empty();
    let json = cli("metrics")
        .pwd(temp.path())
        .args(&["--compact"])
        .passes()
        .json();

    assert_eq!(json["themes"], serde_json::json!([]));
    assert_eq!(json["aggregatedMetrics"]["overall"]["line"]["percentage"], 0.0);
}

#[test]
fn compact_output_is_a_single_line() {
    let temp = Project::empty();
    let output = cli("metrics")
        .pwd(temp.path())
        .args(&["--compact", "--root"])
        .arg_path(fixture("metrics/healthy"))
        .passes()
        .stdout();
    assert_eq!(output.lines().count(), 1);
}
