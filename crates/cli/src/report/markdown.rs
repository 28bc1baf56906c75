// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown format report output.

use std::fmt::Write;

use crate::error::Result;
use crate::metrics::CoverageMetric;
use crate::model::{ScenarioStatus, TestResult};

use super::{CriteriaOutcome, GENERATOR_NAME, RenderContext, ReportFormatter, iso};

/// Markdown format report formatter.
pub struct MarkdownFormatter;

fn step_icon(status: ScenarioStatus) -> &'static str {
    match status {
        ScenarioStatus::Passed => "✅",
        ScenarioStatus::Failed => "❌",
        ScenarioStatus::Pending | ScenarioStatus::Skipped => "⏭️",
    }
}

fn coverage_row(out: &mut String, label: &str, metric: &CoverageMetric) -> Result<()> {
    writeln!(
        out,
        "| {label} | {:.2}% | {}/{} |",
        metric.percentage, metric.covered, metric.total
    )?;
    Ok(())
}

impl MarkdownFormatter {
    fn write_summary(out: &mut String, result: &TestResult, ctx: &RenderContext<'_>) -> Result<()> {
        let stats = &result.statistics;
        writeln!(out, "# Test Report: {}\n", result.test_suite_id)?;
        writeln!(out, "**Generated:** {}", iso(ctx.generated_at))?;
        writeln!(out, "**Status:** {}", result.status)?;
        writeln!(out, "**Duration:** {}ms", stats.execution_time)?;

        writeln!(out, "\n## Summary\n")?;
        writeln!(out, "| Metric | Value |")?;
        writeln!(out, "|--------|-------|")?;
        writeln!(out, "| Total Scenarios | {} |", result.total_scenarios)?;
        writeln!(out, "| Passed | {} |", result.passed_scenarios)?;
        writeln!(out, "| Failed | {} |", result.failed_scenarios)?;
        writeln!(out, "| Pending | {} |", result.pending_scenarios)?;
        writeln!(out, "| Skipped | {} |", result.skipped_scenarios)?;
        writeln!(out, "| Success Rate | {:.2}% |", stats.success_rate)?;
        writeln!(out, "| Execution Time | {}ms |", stats.execution_time)?;
        Ok(())
    }

    fn write_metrics(out: &mut String, result: &TestResult) -> Result<()> {
        if let Some(coverage) = &result.metadata.coverage {
            writeln!(out, "\n## Coverage\n")?;
            writeln!(out, "| Type | Percentage | Covered/Total |")?;
            writeln!(out, "|------|------------|---------------|")?;
            let st = &coverage.system_test;
            coverage_row(out, "System Test Classes", &st.class)?;
            coverage_row(out, "System Test Branches", &st.branch)?;
            let ov = &coverage.overall;
            coverage_row(out, "Overall Classes", &ov.class)?;
            coverage_row(out, "Overall Branches", &ov.branch)?;
            coverage_row(out, "Overall Lines", &ov.line)?;
            coverage_row(out, "Overall Methods", &ov.method)?;
        }

        if let Some(dup) = &result.metadata.duplication {
            writeln!(out, "\n## Code Duplication\n")?;
            writeln!(out, "- **Duplication Percentage:** {:.2}%", dup.percentage)?;
            writeln!(
                out,
                "- **Duplicated Lines:** {} / {}",
                dup.duplicated_lines, dup.total_lines
            )?;
            if !dup.duplicated_blocks.is_empty() {
                writeln!(out, "- **Duplicated Blocks:** {}", dup.duplicated_blocks.len())?;
            }
        }
        Ok(())
    }

    fn write_scenarios(out: &mut String, result: &TestResult) -> Result<()> {
        writeln!(out, "\n## Test Scenarios")?;
        for (i, scenario) in result.scenarios.iter().enumerate() {
            writeln!(out, "\n### {}. {}\n", i + 1, scenario.name)?;
            writeln!(out, "- **Status:** {}", scenario.status)?;
            writeln!(out, "- **Duration:** {}ms", scenario.duration)?;
            if let Some(message) = &scenario.error_message {
                writeln!(out, "- **Error:** {message}")?;
            }
            if scenario.steps.is_empty() {
                continue;
            }
            writeln!(out, "\n**Steps:**\n")?;
            for (j, step) in scenario.steps.iter().enumerate() {
                writeln!(out, "{}. {} {}", j + 1, step_icon(step.status), step.text)?;
                if let Some(message) = &step.error_message {
                    writeln!(out, "   - Error: {message}")?;
                }
            }
        }
        Ok(())
    }

    fn write_context(out: &mut String, result: &TestResult) -> Result<()> {
        let logs = &result.metadata.log_entries;
        if !logs.is_empty() {
            writeln!(out, "\n## Log Entries\n")?;
            writeln!(out, "```")?;
            for entry in logs {
                writeln!(
                    out,
                    "[{}] {} - {}",
                    entry.level.as_str().to_uppercase(),
                    iso(entry.timestamp),
                    entry.message
                )?;
            }
            writeln!(out, "```")?;
        }

        if let Some(setup) = &result.metadata.setup_config {
            writeln!(out, "\n## Test Setup Configuration\n")?;
            writeln!(
                out,
                "- **Test Framework:** {}",
                setup.test_framework.as_deref().unwrap_or("N/A")
            )?;
            writeln!(out, "- **Environment:** {}", setup.environment)?;
            writeln!(out, "- **Test Timeout:** {}ms", setup.test_timeout)?;
            let t = &setup.coverage_threshold;
            writeln!(out, "- **Coverage Thresholds:**")?;
            writeln!(out, "  - statements: {}%", t.statements)?;
            writeln!(out, "  - branches: {}%", t.branches)?;
            writeln!(out, "  - functions: {}%", t.functions)?;
            writeln!(out, "  - lines: {}%", t.lines)?;
        }
        Ok(())
    }

    fn write_criteria(out: &mut String, criteria: Option<&CriteriaOutcome>) -> Result<()> {
        let Some(criteria) = criteria else {
            return Ok(());
        };
        writeln!(out, "\n## Pass Criteria Validation\n")?;
        match criteria {
            CriteriaOutcome::Verdict(validation) => {
                let status = if validation.passed {
                    "✅ PASSED"
                } else {
                    "❌ FAILED"
                };
                writeln!(out, "**Overall Status:** {status}")?;
                writeln!(
                    out,
                    "**Passed Criteria:** {}/{}",
                    validation.summary.passed_criteria, validation.summary.total_criteria
                )?;
                writeln!(out, "\n### Criteria Results\n")?;
                for criterion in &validation.criteria {
                    let icon = if criterion.passed { "✅" } else { "❌" };
                    writeln!(
                        out,
                        "- {icon} **{}**: {:.2}% (threshold: {}%)",
                        criterion.name, criterion.actual, criterion.threshold
                    )?;
                }
            }
            CriteriaOutcome::Unavailable(error) => {
                writeln!(out, "⚠️ Unable to validate pass criteria: {error}")?;
            }
        }
        Ok(())
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, result: &TestResult, ctx: &RenderContext<'_>) -> Result<String> {
        let mut out = String::with_capacity(2048 + result.step_count() * 64);
        Self::write_summary(&mut out, result, ctx)?;
        Self::write_metrics(&mut out, result)?;
        Self::write_scenarios(&mut out, result)?;
        Self::write_context(&mut out, result)?;
        Self::write_criteria(&mut out, ctx.criteria.as_ref())?;

        let generator = ctx.options.generator_name().unwrap_or(GENERATOR_NAME);
        writeln!(out, "\n---")?;
        writeln!(out, "*Report generated by {generator}*")?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
