// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CSV format report output: one row per scenario.

use crate::error::Result;
use crate::model::{ScenarioStatus, TestResult};

use super::escape::csv as esc;
use super::{RenderContext, ReportFormatter};

pub const HEADER: &str =
    "scenario_name,status,duration_ms,steps_total,steps_passed,steps_failed,error_message";

/// CSV format report formatter.
pub struct CsvFormatter;

impl ReportFormatter for CsvFormatter {
    fn format(&self, result: &TestResult, _ctx: &RenderContext<'_>) -> Result<String> {
        let mut rows = Vec::with_capacity(result.scenarios.len() + 1);
        rows.push(HEADER.to_string());
        for scenario in &result.scenarios {
            let fields = [
                esc(&scenario.name).into_owned(),
                scenario.status.to_string(),
                scenario.duration.to_string(),
                scenario.steps.len().to_string(),
                scenario.steps_with(ScenarioStatus::Passed).to_string(),
                scenario.steps_with(ScenarioStatus::Failed).to_string(),
                esc(scenario.error_message.as_deref().unwrap_or_default()).into_owned(),
            ];
            rows.push(fields.join(","));
        }
        Ok(rows.join("\n"))
    }
}

#[cfg(test)]
#[path = "csv_tests.rs"]
mod tests;
