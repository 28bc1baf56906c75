// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::config::ReportOptions;
use crate::criteria::PassCriteriaValidator;
use crate::logsink::{LogEntry, LogLevel};
use crate::metrics::SetupConfig;
use crate::test_utils::{StubMetrics, fixed_time, login_result, mixed_result};

fn render_with(result: &TestResult, criteria: Option<CriteriaOutcome>) -> String {
    let options = ReportOptions::default();
    let mut ctx = RenderContext::new(&options, fixed_time());
    ctx.criteria = criteria;
    MarkdownFormatter.format(result, &ctx).unwrap()
}

fn render(result: &TestResult) -> String {
    render_with(result, None)
}

#[test]
fn markdown_header_and_summary() {
    let output = render(&login_result());
    assert!(output.starts_with("# Test Report: login-v1\n"));
    assert!(output.contains("**Generated:** 2026-01-15T10:30:00.000Z"));
    assert!(output.contains("**Status:** passed"));
    assert!(output.contains("| Total Scenarios | 1 |"));
    assert!(output.contains("| Success Rate | 100.00% |"));
}

#[test]
fn markdown_lists_scenarios_with_step_icons() {
    let output = render(&mixed_result());
    assert!(output.contains("### 1. Successful login"));
    assert!(output.contains("### 2. Pay with <expired> card & \"retry\""));
    assert!(output.contains("1. ✅ Given a cart"));
    assert!(output.contains("2. ❌ When I pay"));
    assert!(output.contains("   - Error: expected 'declined' but got <ok>"));
    assert!(output.contains("3. ⏭️ Then I see a receipt"));
    assert!(output.contains("### 3. Gift cards"));
}

#[test]
fn markdown_optional_sections_absent_by_default() {
    let output = render(&login_result());
    assert!(!output.contains("## Coverage"));
    assert!(!output.contains("## Code Duplication"));
    assert!(!output.contains("## Log Entries"));
    assert!(!output.contains("## Test Setup Configuration"));
    assert!(!output.contains("## Pass Criteria Validation"));
}

#[test]
fn markdown_renders_metadata_sections() {
    let mut result = login_result();
    let metrics = StubMetrics::uniform(90, 2).metrics.unwrap();
    result.metadata.coverage = Some(metrics.coverage_summary());
    result.metadata.duplication = Some(metrics.duplication.clone());
    result.metadata.setup_config = Some(SetupConfig::default());
    result.metadata.log_entries = vec![LogEntry {
        timestamp: fixed_time(),
        level: LogLevel::Error,
        message: "boom".to_string(),
    }];

    let output = render(&result);
    assert!(output.contains("| System Test Classes | 90.00% | 90/100 |"));
    assert!(output.contains("- **Duplication Percentage:** 2.00%"));
    assert!(output.contains("[ERROR] 2026-01-15T10:30:00.000Z - boom"));
    assert!(output.contains("- **Test Framework:** N/A"));
    assert!(output.contains("- **Test Timeout:** 30000ms"));
}

#[tokio::test]
async fn markdown_shows_execution_success_criterion_passed() {
    let validator = PassCriteriaValidator::new(StubMetrics::uniform(85, 1).shared());
    let result = login_result();
    let verdict = validator.validate(&result).await.unwrap();

    let output = render_with(&result, Some(CriteriaOutcome::Verdict(verdict)));
    assert!(output.contains("## Pass Criteria Validation"));
    assert!(output.contains("**Overall Status:** ✅ PASSED"));
    assert!(output.contains("**Passed Criteria:** 6/6"));
    assert!(output.contains("- ✅ **Test Execution Success**: 100.00% (threshold: 100%)"));
}

#[tokio::test]
async fn markdown_shows_failed_criteria() {
    let validator = PassCriteriaValidator::new(StubMetrics::uniform(50, 10).shared());
    let result = mixed_result();
    let verdict = validator.validate(&result).await.unwrap();

    let output = render_with(&result, Some(CriteriaOutcome::Verdict(verdict)));
    assert!(output.contains("**Overall Status:** ❌ FAILED"));
    assert!(output.contains("**Passed Criteria:** 0/6"));
    assert!(output.contains("- ❌ **Branch Coverage**: 50.00% (threshold: 80%)"));
}

#[test]
fn markdown_unavailable_criteria_render_warning() {
    let output = render_with(
        &login_result(),
        Some(CriteriaOutcome::Unavailable("metrics error: disk gone".to_string())),
    );
    assert!(output.contains("⚠️ Unable to validate pass criteria: metrics error: disk gone"));
    assert!(!output.contains("**Overall Status:**"));
}

#[test]
fn markdown_footer_names_generator() {
    let output = render(&login_result());
    assert!(output.ends_with("---\n*Report generated by Story Reporter*\n"));

    let mut options = ReportOptions::default();
    options
        .metadata
        .insert("reportGenerator".to_string(), serde_json::json!("CI Bot"));
    let ctx = RenderContext::new(&options, fixed_time());
    let output = MarkdownFormatter.format(&login_result(), &ctx).unwrap();
    assert!(output.contains("*Report generated by CI Bot*"));
}
