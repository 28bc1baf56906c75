// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cucumber JSON report runner.
//!
//! Converts the JSON reports written by `cucumber --format json` into a
//! [`TestResult`]. Each report file is one unit of work.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{TestRunner, format_timeout_error};
use crate::config::TestConfiguration;
use crate::error::{Error, Result};
use crate::events::{Event, EventEmitter};
use crate::logsink::{LogLevel, LogSink};
use crate::model::{
    ScenarioResult, ScenarioStatus, SourceLocation, StepResult, TestResult, TestStatus,
};

/// Cucumber JSON output is an array of features.
pub(crate) type CucumberOutput = Vec<CucumberFeature>;

/// A single feature file from Cucumber.
#[derive(Debug, Deserialize)]
pub(crate) struct CucumberFeature {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<CucumberElement>,
}

/// A scenario or background from Cucumber.
#[derive(Debug, Deserialize)]
pub(crate) struct CucumberElement {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub tags: Vec<CucumberTag>,
    #[serde(default)]
    pub steps: Vec<CucumberStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CucumberTag {
    pub name: String,
}

/// A single step in a Cucumber scenario.
#[derive(Debug, Deserialize)]
pub(crate) struct CucumberStep {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub result: Option<CucumberStepResult>,
}

/// Result of executing a Cucumber step.
#[derive(Debug, Deserialize)]
pub(crate) struct CucumberStepResult {
    pub status: String, // "passed", "failed", "pending", "skipped", "undefined", "ambiguous"
    #[serde(default)]
    pub duration: u64, // nanoseconds
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Parse a Cucumber JSON report.
pub(crate) fn parse_cucumber_report(content: &str) -> serde_json::Result<CucumberOutput> {
    serde_json::from_str(content)
}

fn step_status(result: Option<&CucumberStepResult>) -> ScenarioStatus {
    match result.map(|r| r.status.as_str()) {
        Some("passed") => ScenarioStatus::Passed,
        Some("failed") => ScenarioStatus::Failed,
        Some("skipped") | None => ScenarioStatus::Skipped,
        Some(_) => ScenarioStatus::Pending,
    }
}

/// Roll step statuses up into a scenario status.
///
/// Failed beats pending; a scenario is skipped only when every step was.
fn rollup(statuses: &[ScenarioStatus]) -> ScenarioStatus {
    if statuses.contains(&ScenarioStatus::Failed) {
        ScenarioStatus::Failed
    } else if statuses.contains(&ScenarioStatus::Pending) {
        ScenarioStatus::Pending
    } else if !statuses.is_empty() && statuses.iter().all(|s| *s == ScenarioStatus::Skipped) {
        ScenarioStatus::Skipped
    } else {
        ScenarioStatus::Passed
    }
}

/// Whether a scenario with `tags` survives the include/exclude filters.
fn matches_tags(tags: &[String], include: &[String], exclude: &[String]) -> bool {
    if !include.is_empty() && !tags.iter().any(|t| include.contains(t)) {
        return false;
    }
    !tags.iter().any(|t| exclude.contains(t))
}

/// Split a Cucumber error into its first line and, if longer, the full text.
fn split_error(text: &str) -> (String, Option<String>) {
    let first = text.lines().next().unwrap_or_default().trim().to_string();
    let stack = text.contains('\n').then(|| text.to_string());
    (first, stack)
}

/// Convert one scenario element, laying its steps out from `start`.
fn scenario_from(
    feature: &CucumberFeature,
    element: &CucumberElement,
    start: DateTime<Utc>,
) -> ScenarioResult {
    let mut cursor = start;
    let mut total_nanos: u64 = 0;
    let mut steps = Vec::with_capacity(element.steps.len());

    for step in &element.steps {
        let nanos = step.result.as_ref().map_or(0, |r| r.duration);
        total_nanos = total_nanos.saturating_add(nanos);
        let text = format!("{}{}", step.keyword, step.name).trim().to_string();
        let mut result = StepResult::new(text, step_status(step.result.as_ref()));
        result.duration = nanos / 1_000_000;
        result.start_time = cursor;
        let elapsed = chrono::Duration::nanoseconds(i64::try_from(nanos).unwrap_or(i64::MAX));
        cursor = cursor.checked_add_signed(elapsed).unwrap_or(cursor);
        result.end_time = cursor;
        if let Some(message) = step.result.as_ref().and_then(|r| r.error_message.as_deref()) {
            let (first, stack) = split_error(message);
            result.error_message = Some(first);
            result.error_stack = stack;
        }
        steps.push(result);
    }

    let statuses: Vec<_> = steps.iter().map(|s| s.status).collect();
    let name = if element.name.is_empty() {
        format!("Scenario in {}", feature.name)
    } else {
        element.name.clone()
    };
    let mut scenario = ScenarioResult::new(name, rollup(&statuses));
    scenario.start_time = start;
    scenario.end_time = cursor;
    scenario.duration = total_nanos / 1_000_000;
    if let Some(failed) = steps.iter().find(|s| s.status == ScenarioStatus::Failed) {
        scenario.error_message = failed.error_message.clone();
        scenario.error_stack = failed.error_stack.clone();
    }
    scenario.tags = element.tags.iter().map(|t| t.name.clone()).collect();
    if element.line > 0 {
        scenario.location = Some(SourceLocation {
            file: feature.uri.clone(),
            line: element.line,
        });
    }
    scenario.steps = steps;
    scenario
}

/// Assemble the suite result from converted scenarios.
fn build_result(
    config: &TestConfiguration,
    scenarios: Vec<ScenarioResult>,
    started: DateTime<Utc>,
    ended: DateTime<Utc>,
) -> TestResult {
    let count = |status| scenarios.iter().filter(|s| s.status == status).count() as u64;
    let passed = count(ScenarioStatus::Passed);
    let failed = count(ScenarioStatus::Failed);
    let status = if failed > 0 {
        TestStatus::Failed
    } else {
        TestStatus::Passed
    };

    let mut result = TestResult::create_default(&config.test_suite_id, status);
    result.start_time = started;
    result.end_time = ended;
    result.total_scenarios = scenarios.len() as u64;
    result.passed_scenarios = passed;
    result.failed_scenarios = failed;
    result.pending_scenarios = count(ScenarioStatus::Pending);
    result.skipped_scenarios = count(ScenarioStatus::Skipped);

    let stats = &mut result.statistics;
    for step in scenarios.iter().flat_map(|s| &s.steps) {
        stats.total_steps += 1;
        match step.status {
            ScenarioStatus::Passed => stats.passed_steps += 1,
            ScenarioStatus::Failed => stats.failed_steps += 1,
            ScenarioStatus::Pending => stats.pending_steps += 1,
            ScenarioStatus::Skipped => stats.skipped_steps += 1,
        }
    }
    stats.execution_time = scenarios
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.duration));
    stats.average_step_time = if stats.total_steps == 0 {
        0.0
    } else {
        stats.execution_time as f64 / stats.total_steps as f64
    };
    stats.success_rate = if scenarios.is_empty() {
        0.0
    } else {
        passed as f64 / scenarios.len() as f64 * 100.0
    };

    result.configuration = config.snapshot();
    result.scenarios = scenarios;
    result
}

/// [`TestRunner`] over Cucumber JSON report files.
pub struct CucumberReportRunner {
    reports: Vec<PathBuf>,
    events: EventEmitter,
    config: Mutex<Option<TestConfiguration>>,
    logger: Mutex<Option<(Arc<dyn LogSink>, String)>>,
    token: Mutex<Option<CancellationToken>>,
    running: AtomicBool,
}

impl CucumberReportRunner {
    pub fn new(reports: Vec<PathBuf>) -> Self {
        Self {
            reports,
            events: EventEmitter::new(),
            config: Mutex::new(None),
            logger: Mutex::new(None),
            token: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn configuration(&self) -> Option<TestConfiguration> {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        let logger = self
            .logger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some((sink, id)) = logger
            && let Err(e) = sink.log(&id, level, &message)
        {
            debug!("external logger rejected entry: {e}");
        }
        self.events.emit(Event::log(level, message));
    }

    async fn collect(
        &self,
        config: &TestConfiguration,
        cancel: &CancellationToken,
        started: DateTime<Utc>,
    ) -> Result<Vec<ScenarioResult>> {
        let mut scenarios = Vec::new();
        let mut cursor = started;
        let total = self.reports.len();

        for (index, path) in self.reports.iter().enumerate() {
            if cancel.is_cancelled() {
                self.log(LogLevel::Warn, "Cancellation requested, stopping early");
                break;
            }
            self.events.emit(Event::progress(
                "report-file",
                format!("Reading {} ({}/{total})", path.display(), index + 1),
            ));

            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::Runner(format!("Report file not found: {}: {e}", path.display()))
            })?;
            let features = parse_cucumber_report(&content).map_err(|e| {
                Error::Runner(format!(
                    "Failed to parse cucumber report {}: {e}",
                    path.display()
                ))
            })?;
            self.log(
                LogLevel::Debug,
                format!("Parsed cucumber report with {} features", features.len()),
            );

            for feature in &features {
                if cancel.is_cancelled() {
                    break;
                }
                self.events.emit(Event::FeatureStart {
                    name: feature.name.clone(),
                    timestamp: Utc::now(),
                });

                let mut converted = Vec::new();
                for element in &feature.elements {
                    if element.element_type != "scenario" {
                        continue;
                    }
                    let tags: Vec<String> = element.tags.iter().map(|t| t.name.clone()).collect();
                    if !matches_tags(&tags, &config.tags, &config.exclude_tags) {
                        continue;
                    }
                    let scenario = scenario_from(feature, element, cursor);
                    cursor = scenario.end_time;
                    converted.push(scenario);
                }

                let status = if converted.is_empty() {
                    ScenarioStatus::Skipped
                } else {
                    let statuses: Vec<_> = converted.iter().map(|s| s.status).collect();
                    rollup(&statuses)
                };
                self.events.emit(Event::FeatureComplete {
                    name: feature.name.clone(),
                    status,
                    timestamp: Utc::now(),
                });
                scenarios.extend(converted);
                tokio::task::yield_now().await;
            }
        }
        Ok(scenarios)
    }

    async fn run(
        &self,
        config: &TestConfiguration,
        cancel: &CancellationToken,
    ) -> Result<TestResult> {
        let started = Utc::now();
        self.log(
            LogLevel::Info,
            format!("Starting test execution for suite: {}", config.test_suite_id),
        );
        self.events.emit(Event::TestStart {
            test_suite_id: config.test_suite_id.clone(),
            timestamp: started,
        });

        let limit = Duration::from_millis(config.timeout);
        let scenarios =
            match tokio::time::timeout(limit, self.collect(config, cancel, started)).await {
                Ok(Ok(scenarios)) => scenarios,
                Ok(Err(e)) => {
                    self.log(LogLevel::Error, format!("Test execution failed: {e}"));
                    return Err(e);
                }
                Err(_) => {
                    let message = format_timeout_error(config.timeout);
                    self.log(LogLevel::Error, message.clone());
                    return Err(Error::Runner(message));
                }
            };

        let result = build_result(config, scenarios, started, Utc::now());
        self.events.emit(Event::TestComplete {
            test_suite_id: config.test_suite_id.clone(),
            status: result.status,
            timestamp: result.end_time,
        });
        self.log(
            LogLevel::Info,
            format!(
                "Test execution completed: {}/{} scenarios passed",
                result.passed_scenarios, result.total_scenarios
            ),
        );
        Ok(result)
    }
}

#[async_trait]
impl TestRunner for CucumberReportRunner {
    fn events(&self) -> &EventEmitter {
        &self.events
    }

    fn configure(&self, config: &TestConfiguration) -> Result<()> {
        config.validate()?;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = Some(config.clone());
        self.log(
            LogLevel::Info,
            format!("Test runner configured for suite: {}", config.test_suite_id),
        );
        Ok(())
    }

    fn set_external_logger(&self, sink: Arc<dyn LogSink>, logger_id: &str) {
        *self.logger.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((sink, logger_id.to_string()));
        self.log(LogLevel::Info, "External logger set for test runner");
    }

    async fn execute_tests(&self, cancel: CancellationToken) -> Result<TestResult> {
        let config = self
            .configuration()
            .ok_or(Error::NotConfigured("test runner"))?;

        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(cancel.clone());
        self.running.store(true, Ordering::SeqCst);
        let outcome = self.run(&config, &cancel).await;
        self.running.store(false, Ordering::SeqCst);
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        outcome
    }

    fn cancel(&self) {
        let token = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(token) = token {
            token.cancel();
            self.log(LogLevel::Warn, "Test execution cancelled");
        }
    }

    async fn cleanup(&self) {
        if self.is_running() {
            self.cancel();
        }
        self.log(LogLevel::Info, "Test runner cleanup complete");
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = None;
        *self.logger.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.events.remove_all_observers();
    }
}

#[cfg(test)]
#[path = "cucumber_tests.rs"]
mod tests;
