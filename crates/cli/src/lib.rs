// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scenario test orchestration with multi-format reports.
//!
//! A [`SuiteManager`] drives a [`TestRunner`] and hands the resulting
//! [`TestResult`] to the [`ReportGenerator`], which renders HTML, JSON,
//! JUnit XML, CSV and Markdown. Coverage and duplication metrics gathered
//! by [`MetricsAggregator`] feed the JSON metadata and the pass-criteria
//! verdict.

pub mod cli;
pub mod color;
pub mod config;
pub mod criteria;
pub mod discovery;
pub mod error;
pub mod events;
pub mod logsink;
pub mod metrics;
pub mod model;
pub mod report;
pub mod runner;
pub mod suite;

pub use cli::{Cli, Command, MetricsArgs, RenderArgs, RunArgs, ValidateArgs};
pub use config::TestConfiguration;
pub use criteria::{PassCriteriaValidator, ValidationResult};
pub use error::{Error, ExitCode, Result};
pub use events::{Event, EventEmitter};
pub use logsink::{LogEntry, LogLevel, LogSink, MemoryLogSink};
pub use metrics::{AggregatedMetrics, MetricsAggregator, MetricsSource};
pub use model::{ScenarioResult, ScenarioStatus, StepResult, TestResult, TestStatus};
pub use report::{ReportFormat, ReportGenerator};
pub use runner::{CucumberReportRunner, TestRunner};
pub use suite::{SuiteManager, SuiteRun};

#[cfg(test)]
pub mod test_utils;
