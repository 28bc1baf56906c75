// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JUnit-compatible XML report output.

use std::fmt::Write;

use crate::error::Result;
use crate::model::{ScenarioStatus, TestResult};

use super::escape::xml as esc;
use super::{RenderContext, ReportFormatter, iso};

/// XML format report formatter.
pub struct XmlFormatter;

/// Milliseconds as seconds with three decimals.
fn seconds(ms: u64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

impl ReportFormatter for XmlFormatter {
    fn format(&self, result: &TestResult, ctx: &RenderContext<'_>) -> Result<String> {
        let options = &ctx.options.xml;
        let pad = |level: usize| " ".repeat(options.indent * level);
        let suite = esc(&result.test_suite_id);

        let mut out = String::with_capacity(512 + result.scenarios.len() * 160);
        write!(out, r#"<?xml version="1.0" encoding="{}""#, esc(&options.encoding))?;
        if options.standalone {
            out.push_str(r#" standalone="yes""#);
        }
        out.push_str("?>\n<testsuites>\n");
        writeln!(
            out,
            r#"{}<testsuite name="{suite}" tests="{}" failures="{}" errors="0" time="{}" timestamp="{}">"#,
            pad(1),
            result.total_scenarios,
            result.failed_scenarios,
            seconds(result.statistics.execution_time),
            iso(result.start_time),
        )?;

        for scenario in &result.scenarios {
            let open = format!(
                r#"{}<testcase name="{}" classname="{suite}" time="{}""#,
                pad(2),
                esc(&scenario.name),
                seconds(scenario.duration),
            );
            match scenario.status {
                ScenarioStatus::Failed => {
                    let message = esc(scenario.error_message.as_deref().unwrap_or("Test failed"));
                    let body = scenario
                        .error_stack
                        .as_deref()
                        .map_or_else(|| message.clone(), esc);
                    writeln!(out, "{open}>")?;
                    writeln!(
                        out,
                        r#"{}<failure message="{message}" type="AssertionError">{body}</failure>"#,
                        pad(3)
                    )?;
                    writeln!(out, "{}</testcase>", pad(2))?;
                }
                ScenarioStatus::Skipped => {
                    writeln!(out, "{open}>")?;
                    writeln!(out, r#"{}<skipped message="Test skipped" />"#, pad(3))?;
                    writeln!(out, "{}</testcase>", pad(2))?;
                }
                ScenarioStatus::Passed | ScenarioStatus::Pending => {
                    writeln!(out, "{open} />")?;
                }
            }
        }

        writeln!(out, "{}</testsuite>", pad(1))?;
        out.push_str("</testsuites>\n");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "xml_tests.rs"]
mod tests;
