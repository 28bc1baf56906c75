//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::{Error, Result};
use crate::metrics::{
    AggregatedMetrics, CoverageData, CoverageDetails, CoverageMetric, DuplicationData,
    MetricsSource, SetupConfig, ThemeMetrics,
};
use crate::model::{ScenarioResult, ScenarioStatus, StepResult, TestResult, TestStatus};

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
///
/// # Example
///
/// ```ignore
/// let tmp = TempDir::new().unwrap();
/// create_tree(tmp.path(), &[
///     ("demo/portal/coverage/theme-coverage.json", "{}"),
///     ("theme-registry.json", r#"{"themes":[]}"#),
/// ]);
/// ```
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Metrics source with a canned snapshot, or a canned failure.
pub struct StubMetrics {
    pub metrics: Option<AggregatedMetrics>,
    pub setup: SetupConfig,
}

impl StubMetrics {
    /// Single theme with uniform coverage and the given duplication.
    pub fn uniform(coverage_pct: u64, duplicated_lines: u64) -> Self {
        let metric = CoverageMetric::new(coverage_pct, 100);
        let details = CoverageDetails {
            class: metric,
            branch: metric,
            line: metric,
            method: metric,
        };
        let theme = ThemeMetrics {
            name: "portal".to_string(),
            path: "demo/portal".into(),
            coverage: CoverageData {
                system_test: details,
                overall: details,
                ..CoverageData::default()
            },
            duplication: DuplicationData {
                percentage: duplicated_lines as f64,
                duplicated_lines,
                total_lines: 100,
                duplicated_blocks: Vec::new(),
            },
        };
        Self {
            metrics: Some(AggregatedMetrics::from_themes(vec![theme], fixed_time())),
            setup: SetupConfig::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            metrics: None,
            setup: SetupConfig::default(),
        }
    }

    pub fn shared(self) -> Arc<dyn MetricsSource> {
        Arc::new(self)
    }
}

#[async_trait]
impl MetricsSource for StubMetrics {
    async fn aggregate_metrics(&self) -> Result<AggregatedMetrics> {
        self.metrics
            .clone()
            .ok_or_else(|| Error::Metrics("metrics unavailable".to_string()))
    }

    async fn setup_config(&self, _theme: Option<&Path>) -> SetupConfig {
        self.setup.clone()
    }
}

pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap()
}

/// The "login-v1" result: one passed scenario with two passed steps.
pub fn login_result() -> TestResult {
    let mut result = TestResult::create_default("login-v1", TestStatus::Passed);
    result.start_time = fixed_time();
    result.end_time = fixed_time() + chrono::Duration::milliseconds(1500);

    let mut scenario = ScenarioResult::new("Successful login", ScenarioStatus::Passed);
    scenario.start_time = result.start_time;
    scenario.end_time = result.end_time;
    scenario.duration = 1500;
    scenario.steps = vec![
        StepResult::new("Given I am on the login page", ScenarioStatus::Passed),
        StepResult::new("When I enter valid credentials", ScenarioStatus::Passed),
    ];
    result.scenarios = vec![scenario];
    result.total_scenarios = 1;
    result.passed_scenarios = 1;
    result.statistics.total_steps = 2;
    result.statistics.passed_steps = 2;
    result.statistics.execution_time = 1500;
    result.statistics.average_step_time = 750.0;
    result.statistics.success_rate = 100.0;
    result
}

/// A result with a failed and a skipped scenario.
pub fn mixed_result() -> TestResult {
    let mut result = login_result();
    result.test_suite_id = "checkout".to_string();
    result.status = TestStatus::Failed;

    let mut failed = ScenarioResult::new("Pay with <expired> card & \"retry\"", ScenarioStatus::Failed);
    failed.duration = 250;
    failed.error_message = Some("expected 'declined' but got <ok>".to_string());
    let mut step = StepResult::new("When I pay", ScenarioStatus::Failed);
    step.error_message = failed.error_message.clone();
    failed.steps = vec![
        StepResult::new("Given a cart", ScenarioStatus::Passed),
        step,
        StepResult::new("Then I see a receipt", ScenarioStatus::Skipped),
    ];

    let skipped = ScenarioResult::new("Gift cards", ScenarioStatus::Skipped);

    result.scenarios.push(failed);
    result.scenarios.push(skipped);
    result.total_scenarios = 3;
    result.failed_scenarios = 1;
    result.skipped_scenarios = 1;
    result.statistics.success_rate = 100.0 / 3.0;
    result
}
