// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pass-criteria validation.
//!
//! Six fixed criteria are evaluated against an aggregated metrics snapshot
//! and a result's statistics. Coverage thresholds come from the setup
//! configuration; the duplication ceiling and the execution bar are fixed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{DUPLICATION_CEILING, MetricsSource};
use crate::model::TestResult;

/// Required execution success rate, in percent.
pub const EXECUTION_SUCCESS_TARGET: f64 = 100.0;

/// Outcome of one named criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub name: String,
    pub description: String,
    pub passed: bool,
    pub threshold: f64,
    pub actual: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total_criteria: usize,
    pub passed_criteria: usize,
    pub failed_criteria: usize,
}

/// Verdict over every criterion, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub timestamp: DateTime<Utc>,
    pub criteria: Vec<CriterionResult>,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    fn from_criteria(criteria: Vec<CriterionResult>) -> Self {
        let passed_criteria = criteria.iter().filter(|c| c.passed).count();
        let summary = ValidationSummary {
            total_criteria: criteria.len(),
            passed_criteria,
            failed_criteria: criteria.len() - passed_criteria,
        };
        Self {
            passed: summary.failed_criteria == 0,
            timestamp: Utc::now(),
            criteria,
            summary,
        }
    }

    pub fn criterion(&self, name: &str) -> Option<&CriterionResult> {
        self.criteria.iter().find(|c| c.name == name)
    }
}

/// A coverage criterion passes at or above its threshold.
fn at_least(name: &str, description: &str, actual: f64, threshold: f64) -> CriterionResult {
    let passed = actual >= threshold;
    let message = if passed {
        format!("{name} {actual:.2}% meets the {threshold}% threshold")
    } else {
        format!("{name} {actual:.2}% is below the {threshold}% threshold")
    };
    CriterionResult {
        name: name.to_string(),
        description: description.to_string(),
        passed,
        threshold,
        actual,
        message,
    }
}

/// Evaluates results against coverage, duplication and execution criteria.
#[derive(Clone)]
pub struct PassCriteriaValidator {
    metrics: Arc<dyn MetricsSource>,
}

impl PassCriteriaValidator {
    pub fn new(metrics: Arc<dyn MetricsSource>) -> Self {
        Self { metrics }
    }

    /// Evaluate every criterion.
    ///
    /// Fails only when the metrics source fails.
    pub async fn validate(&self, result: &TestResult) -> Result<ValidationResult> {
        let metrics = self.metrics.aggregate_metrics().await?;
        let setup = self.metrics.setup_config(None).await;
        let thresholds = setup.coverage_threshold;
        let aggregate = &metrics.aggregated_metrics;

        let duplication = metrics.duplication.percentage;
        let duplication_passed = duplication <= DUPLICATION_CEILING;
        let success_rate = result.statistics.success_rate;
        let success_passed = success_rate == EXECUTION_SUCCESS_TARGET;

        let criteria = vec![
            at_least(
                "System Test Class Coverage",
                "Classes exercised by system tests",
                aggregate.system_test.class.percentage,
                thresholds.statements,
            ),
            at_least(
                "Branch Coverage",
                "Branches exercised by system tests",
                aggregate.system_test.branch.percentage,
                thresholds.branches,
            ),
            CriterionResult {
                name: "Code Duplication".to_string(),
                description: "Share of duplicated lines across all themes".to_string(),
                passed: duplication_passed,
                threshold: DUPLICATION_CEILING,
                actual: duplication,
                message: if duplication_passed {
                    format!(
                        "Code duplication {duplication:.2}% is within the {DUPLICATION_CEILING}% limit"
                    )
                } else {
                    format!(
                        "Code duplication {duplication:.2}% exceeds the {DUPLICATION_CEILING}% limit"
                    )
                },
            },
            CriterionResult {
                name: "Test Execution Success".to_string(),
                description: "Every scenario must pass".to_string(),
                passed: success_passed,
                threshold: EXECUTION_SUCCESS_TARGET,
                actual: success_rate,
                message: if success_passed {
                    "All tests passed".to_string()
                } else {
                    format!("Test success rate {success_rate:.2}% is below 100%")
                },
            },
            at_least(
                "Line Coverage",
                "Lines exercised across all test levels",
                aggregate.overall.line.percentage,
                thresholds.lines,
            ),
            at_least(
                "Function Coverage",
                "Functions exercised across all test levels",
                aggregate.overall.method.percentage,
                thresholds.functions,
            ),
        ];

        Ok(ValidationResult::from_criteria(criteria))
    }
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;
