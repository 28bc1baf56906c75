// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical test result model.
//!
//! A [`TestResult`] is produced by a test runner, enriched by the suite
//! manager (status, log entries), and rendered by the report generator.
//! Aggregate counts and statistics are supplied by whoever builds the
//! result and are never recomputed from the scenario list.

mod validate;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logsink::LogEntry;
use crate::metrics::{CoverageSummary, DuplicationData, SetupConfig};

pub use validate::validate_candidate;

/// Overall outcome of a suite execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Pending,
    Cancelled,
}

impl TestStatus {
    pub const ALL: [TestStatus; 4] = [
        TestStatus::Passed,
        TestStatus::Failed,
        TestStatus::Pending,
        TestStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Pending => "pending",
            TestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a scenario or a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Passed,
    Failed,
    Pending,
    Skipped,
}

impl ScenarioStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioStatus::Passed => "passed",
            ScenarioStatus::Failed => "failed",
            ScenarioStatus::Pending => "pending",
            ScenarioStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One execution unit: a whole suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_suite_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: TestStatus,
    pub scenarios: Vec<ScenarioResult>,
    pub total_scenarios: u64,
    #[serde(default)]
    pub passed_scenarios: u64,
    #[serde(default)]
    pub failed_scenarios: u64,
    #[serde(default)]
    pub pending_scenarios: u64,
    #[serde(default)]
    pub skipped_scenarios: u64,
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<String>,
    /// Opaque snapshot of the configuration the run used.
    #[serde(default)]
    pub configuration: serde_json::Value,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl TestResult {
    /// Zero-valued result stamped with the current time.
    ///
    /// Every call builds fresh nested structures; nothing is shared between
    /// instances.
    pub fn create_default(test_suite_id: impl Into<String>, status: TestStatus) -> Self {
        let now = Utc::now();
        Self {
            test_suite_id: test_suite_id.into(),
            start_time: now,
            end_time: now,
            status,
            scenarios: Vec::new(),
            total_scenarios: 0,
            passed_scenarios: 0,
            failed_scenarios: 0,
            pending_scenarios: 0,
            skipped_scenarios: 0,
            statistics: Statistics {
                performance: Some(Performance::default()),
                ..Statistics::default()
            },
            error_message: None,
            error_stack: None,
            configuration: serde_json::Value::Object(serde_json::Map::new()),
            metadata: ResultMetadata::default(),
        }
    }

    /// Validate an untyped candidate and decode it.
    pub fn from_value(candidate: serde_json::Value) -> Result<Self> {
        validate_candidate(&candidate)?;
        serde_json::from_value(candidate).map_err(|e| Error::InvalidResult(e.to_string()))
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| Error::InvalidResult(e.to_string()))?;
        Self::from_value(value)
    }

    /// Total step count across all scenarios.
    pub fn step_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.steps.len()).sum()
    }
}

/// A single scenario within a suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    pub status: ScenarioStatus,
    #[serde(default)]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: DateTime<Utc>,
    /// Milliseconds; supplied, not derived from the timestamps.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ScenarioResult {
    pub fn new(name: impl Into<String>, status: ScenarioStatus) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            status,
            start_time: now,
            end_time: now,
            duration: 0,
            steps: Vec::new(),
            error_message: None,
            error_stack: None,
            tags: Vec::new(),
            location: None,
        }
    }

    pub fn steps_with(&self, status: ScenarioStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }
}

/// Where a scenario is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

/// A single step within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub text: String,
    pub status: ScenarioStatus,
    #[serde(default)]
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl StepResult {
    pub fn new(text: impl Into<String>, status: ScenarioStatus) -> Self {
        let now = Utc::now();
        Self {
            text: text.into(),
            status,
            start_time: now,
            end_time: now,
            duration: 0,
            error_message: None,
            error_stack: None,
            attachments: Vec::new(),
        }
    }
}

/// Data captured alongside a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub data: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
    pub mime_type: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Text,
    Image,
    Log,
    Json,
    Xml,
}

/// Step-level statistics for a run.
///
/// `success_rate` is a percentage (0-100) supplied by the producer; it is
/// not guaranteed to agree with the counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_steps: u64,
    pub passed_steps: u64,
    pub failed_steps: u64,
    pub pending_steps: u64,
    pub skipped_steps: u64,
    /// Milliseconds.
    pub execution_time: u64,
    /// Milliseconds.
    pub average_step_time: f64,
    pub success_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Performance {
    pub memory_usage: u64,
    pub cpu_usage: f64,
    pub peak_memory: u64,
}

/// Cross-cutting data attached to a result by collaborators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultMetadata {
    pub log_entries: Vec<LogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplication: Option<DuplicationData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_config: Option<SetupConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_generated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_generator: Option<String>,
    /// Caller-supplied keys outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
