// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTML format report output.
//!
//! A single self-contained document: inline styles, a statistics card, one
//! collapsible card per scenario, and the log panel.

use std::fmt::Write;

use crate::config::HtmlTheme;
use crate::error::Result;
use crate::logsink::LogLevel;
use crate::model::{ScenarioResult, ScenarioStatus, TestResult};

use super::escape::html as esc;
use super::{RenderContext, ReportFormatter, iso};

const DEFAULT_DESCRIPTION: &str = "Automated story test execution results";

/// HTML format report formatter.
pub struct HtmlFormatter;

impl HtmlFormatter {
    fn palette(theme: HtmlTheme) -> &'static str {
        match theme {
            HtmlTheme::Light => {
                "--bg: #f8f9fa;\n      --card-bg: #ffffff;\n      --text: #212529;\n      --muted: #6c757d;\n      --border: #dee2e6;"
            }
            HtmlTheme::Dark => {
                "--bg: #1a1a2e;\n      --card-bg: #16213e;\n      --text: #eef;\n      --muted: #8892b0;\n      --border: #24304f;"
            }
        }
    }

    fn css(theme: HtmlTheme) -> String {
        let palette = Self::palette(theme);
        format!(
            r#":root {{
      {palette}
      --passed: #28a745;
      --failed: #dc3545;
      --pending: #ffc107;
      --skipped: #6c757d;
    }}
    * {{ box-sizing: border-box; margin: 0; padding: 0; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: var(--bg);
      color: var(--text);
      padding: 2rem;
      line-height: 1.6;
    }}
    .container {{ max-width: 1200px; margin: 0 auto; }}
    header {{ margin-bottom: 2rem; padding-bottom: 1rem; border-bottom: 1px solid var(--border); }}
    h1 {{ font-size: 1.5rem; }}
    h2 {{ font-size: 1.2rem; margin: 1.5rem 0 0.75rem; }}
    .meta {{ color: var(--muted); font-size: 0.875rem; margin-top: 0.5rem; }}
    .card {{
      background: var(--card-bg);
      border: 1px solid var(--border);
      border-radius: 8px;
      padding: 1rem 1.5rem;
      margin-bottom: 1rem;
    }}
    .stats {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 1rem; }}
    .stat-title {{ color: var(--muted); font-size: 0.75rem; text-transform: uppercase; }}
    .stat-value {{ font-size: 1.75rem; font-weight: 600; }}
    .passed {{ color: var(--passed); }}
    .failed {{ color: var(--failed); }}
    .pending {{ color: var(--pending); }}
    .skipped {{ color: var(--skipped); }}
    details.scenario > summary {{ cursor: pointer; display: flex; justify-content: space-between; font-weight: 600; }}
    .badge {{ font-size: 0.75rem; text-transform: uppercase; }}
    ol.steps {{ margin: 0.75rem 0 0 1.5rem; }}
    ol.steps li {{ padding: 0.25rem 0; }}
    .error-message {{ font-family: monospace; white-space: pre-wrap; background: rgba(220,53,69,0.08); padding: 0.5rem; border-radius: 4px; margin-top: 0.5rem; }}
    .logs {{ max-height: 400px; overflow-y: auto; font-family: monospace; font-size: 0.85rem; }}
    .log-level {{ font-weight: 600; margin-right: 0.5rem; }}
    .notice {{ color: var(--muted); font-style: italic; }}
    footer {{ color: var(--muted); font-size: 0.8rem; margin-top: 2rem; }}"#
        )
    }

    /// Render the statistics card.
    ///
    /// The success percentage comes from the scenario counts, not from
    /// `statistics.successRate`.
    fn render_stats(result: &TestResult) -> String {
        let success = if result.total_scenarios == 0 {
            0.0
        } else {
            result.passed_scenarios as f64 / result.total_scenarios as f64 * 100.0
        };
        let stat = |title: &str, value: String, class: &str| {
            format!(
                r#"        <div><div class="stat-title">{title}</div><div class="stat-value {class}">{value}</div></div>"#
            )
        };
        let items = [
            stat("Total Scenarios", result.total_scenarios.to_string(), ""),
            stat("Passed", result.passed_scenarios.to_string(), "passed"),
            stat("Failed", result.failed_scenarios.to_string(), "failed"),
            stat("Pending", result.pending_scenarios.to_string(), "pending"),
            stat("Skipped", result.skipped_scenarios.to_string(), "skipped"),
            stat("Success Rate", format!("{success:.1}%"), ""),
        ];
        format!(
            "    <section class=\"card\">\n      <h2>Test Statistics</h2>\n      <div class=\"stats\">\n{}\n      </div>\n    </section>",
            items.join("\n")
        )
    }

    fn render_scenario(scenario: &ScenarioResult) -> Result<String> {
        let status = scenario.status.as_str();
        let mut out = String::with_capacity(512);
        let open = if scenario.status == ScenarioStatus::Failed {
            " open"
        } else {
            ""
        };
        writeln!(out, r#"    <details class="card scenario"{open}>"#)?;
        writeln!(
            out,
            r#"      <summary><span class="{status}">{}</span><span class="badge {status}">{status}</span></summary>"#,
            esc(&scenario.name)
        )?;
        writeln!(
            out,
            r#"      <p class="meta">Duration: {}ms</p>"#,
            scenario.duration
        )?;
        if let Some(message) = &scenario.error_message {
            writeln!(
                out,
                r#"      <div class="error-message">{}</div>"#,
                esc(message)
            )?;
        }
        if !scenario.steps.is_empty() {
            out.push_str("      <ol class=\"steps\">\n");
            for step in &scenario.steps {
                let step_status = step.status.as_str();
                write!(
                    out,
                    r#"        <li class="{step_status}">{} <small>({step_status}, {}ms)</small>"#,
                    esc(&step.text),
                    step.duration
                )?;
                if let Some(message) = &step.error_message {
                    write!(
                        out,
                        r#"<div class="error-message">{}</div>"#,
                        esc(message)
                    )?;
                }
                out.push_str("</li>\n");
            }
            out.push_str("      </ol>\n");
        }
        out.push_str("    </details>");
        Ok(out)
    }

    fn level_class(level: LogLevel) -> &'static str {
        match level {
            LogLevel::Error => "failed",
            LogLevel::Warn => "pending",
            LogLevel::Info => "passed",
            LogLevel::Debug | LogLevel::Trace => "skipped",
        }
    }

    fn render_logs(result: &TestResult) -> Result<String> {
        let entries = &result.metadata.log_entries;
        if entries.is_empty() {
            return Ok("    <section class=\"card\">\n      <p class=\"notice\">No log entries available</p>\n    </section>".to_string());
        }
        let mut lines = String::new();
        for entry in entries {
            writeln!(
                lines,
                r#"        <div class="log-entry"><span class="log-level {}">{}</span><span class="meta">{}</span> {}</div>"#,
                Self::level_class(entry.level),
                entry.level.as_str().to_uppercase(),
                iso(entry.timestamp),
                esc(&entry.message)
            )?;
        }
        Ok(format!("    <section class=\"card logs\">\n{lines}    </section>"))
    }
}

impl ReportFormatter for HtmlFormatter {
    fn format(&self, result: &TestResult, ctx: &RenderContext<'_>) -> Result<String> {
        let options = ctx.options;
        let default_title = format!("Test Report: {}", result.test_suite_id);
        let title = esc(options.title.as_deref().unwrap_or(&default_title)).into_owned();
        let description = esc(options.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)).into_owned();
        let mut css = Self::css(options.html.theme);
        if let Some(custom) = &options.html.custom_css {
            css.push_str("\n    ");
            css.push_str(custom);
        }

        let scenarios = result
            .scenarios
            .iter()
            .map(Self::render_scenario)
            .collect::<Result<Vec<_>>>()?;
        let scenarios = if scenarios.is_empty() {
            "    <p class=\"notice\">No scenarios executed</p>".to_string()
        } else {
            scenarios.join("\n")
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en" data-theme="{theme}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    {css}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>{title}</h1>
      <p>{description}</p>
      <div class="meta">Test Suite: {suite} &middot; Status: <span class="{status}">{status}</span></div>
      <div class="meta">Start: {start} &middot; End: {end} &middot; Duration: {duration}ms</div>
    </header>
{stats}
    <h2>Test Scenarios</h2>
{scenarios}
    <h2>Test Execution Logs</h2>
{logs}
    <footer>Generated on {generated}</footer>
  </div>
</body>
</html>
"#,
            theme = match options.html.theme {
                HtmlTheme::Light => "light",
                HtmlTheme::Dark => "dark",
            },
            suite = esc(&result.test_suite_id),
            status = result.status,
            start = iso(result.start_time),
            end = iso(result.end_time),
            duration = result.statistics.execution_time,
            stats = Self::render_stats(result),
            logs = Self::render_logs(result)?,
            generated = iso(ctx.generated_at),
        ))
    }
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
