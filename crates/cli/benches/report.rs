// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report rendering benchmarks.
//!
//! Measures formatter performance across:
//! - Every output format (HTML, JSON, XML, CSV, Markdown)
//! - Result sizes from a handful of scenarios to thousands
//! - Text that is heavy in characters needing escapes
//!
//! These benchmarks focus on formatter performance, not file I/O.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use storyreport::config::ReportOptions;
use storyreport::logsink::{LogEntry, LogLevel};
use storyreport::model::{ScenarioResult, ScenarioStatus, StepResult, TestResult, TestStatus};
use storyreport::report::{RenderContext, ReportFormat, formatter};

/// Build a result with `scenarios` scenarios of four steps each.
///
/// Every seventh scenario fails with an error that needs escaping.
fn synthetic_result(scenarios: usize, noisy: bool) -> TestResult {
    let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
    let mut result = TestResult::create_default("bench-suite", TestStatus::Passed);
    result.start_time = start;
    result.end_time = start + chrono::Duration::seconds(scenarios as i64);

    for i in 0..scenarios {
        let failed = i % 7 == 3;
        let name = if noisy {
            format!("Scenario <{i}> with \"quotes\", commas & 'apostrophes'")
        } else {
            format!("Scenario {i}")
        };
        let status = if failed {
            ScenarioStatus::Failed
        } else {
            ScenarioStatus::Passed
        };
        let mut scenario = ScenarioResult::new(name, status);
        scenario.duration = 250 + (i as u64 % 100);
        scenario.steps = (0..4)
            .map(|j| {
                let step_status = if failed && j == 3 {
                    ScenarioStatus::Failed
                } else {
                    ScenarioStatus::Passed
                };
                StepResult::new(format!("Step {j} of scenario {i}"), step_status)
            })
            .collect();
        if failed {
            scenario.error_message = Some(format!("expected <{i}> but got \"{}\"", i + 1));
            scenario.error_stack = Some("at step 3\nat scenario\nat feature".to_string());
            result.failed_scenarios += 1;
            result.status = TestStatus::Failed;
        } else {
            result.passed_scenarios += 1;
        }
        result.scenarios.push(scenario);
    }

    result.total_scenarios = scenarios as u64;
    result.statistics.total_steps = scenarios as u64 * 4;
    result.statistics.passed_steps = result.statistics.total_steps - result.failed_scenarios;
    result.statistics.failed_steps = result.failed_scenarios;
    result.statistics.success_rate = if scenarios == 0 {
        0.0
    } else {
        result.passed_scenarios as f64 / scenarios as f64 * 100.0
    };
    result.metadata.log_entries = (0..scenarios.min(200))
        .map(|i| LogEntry::new(LogLevel::Info, format!("finished scenario {i}")))
        .collect();
    result
}

/// Benchmark each format across result sizes.
fn bench_formats(c: &mut Criterion) {
    let options = ReportOptions::default();
    let generated_at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();

    for format in ReportFormat::ALL {
        let mut group = c.benchmark_group(format!("report/{}", format.name()));
        for size in [10, 100, 1000] {
            let result = synthetic_result(size, false);
            group.bench_with_input(BenchmarkId::new("scenarios", size), &result, |b, r| {
                let ctx = RenderContext::new(&options, generated_at);
                b.iter(|| formatter(format).format(black_box(r), &ctx))
            });
        }
        group.finish();
    }
}

/// Compare all formats on escape-heavy input.
fn bench_escapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("report/escapes");
    let options = ReportOptions::default();
    let generated_at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap();
    let result = synthetic_result(500, true);

    for format in ReportFormat::ALL {
        group.bench_with_input(BenchmarkId::new("noisy", format.name()), &result, |b, r| {
            let ctx = RenderContext::new(&options, generated_at);
            b.iter(|| formatter(format).format(black_box(r), &ctx))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_formats, bench_escapes);
criterion_main!(benches);
