// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test runner seam.
//!
//! A runner turns a configured suite into a [`TestResult`], announcing its
//! progress on its own [`EventEmitter`].

mod cucumber;

pub use cucumber::CucumberReportRunner;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::TestConfiguration;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::logsink::LogSink;
use crate::model::TestResult;

/// Trait for pluggable test runners.
///
/// Runners emit `log`, `progress`, `testStart` and `testComplete`, and may
/// emit `featureStart`/`featureComplete` per feature.
#[async_trait]
pub trait TestRunner: Send + Sync {
    fn events(&self) -> &EventEmitter;

    /// Store the configuration for subsequent executions.
    fn configure(&self, config: &TestConfiguration) -> Result<()>;

    /// Mirror runner log lines into `sink` under `logger_id`.
    fn set_external_logger(&self, sink: Arc<dyn LogSink>, logger_id: &str);

    /// Execute the configured suite.
    ///
    /// Cancellation is cooperative: the runner finishes its current unit of
    /// work once `cancel` fires and returns what it has.
    async fn execute_tests(&self, cancel: CancellationToken) -> Result<TestResult>;

    /// Request cancellation of an in-flight execution; no-op otherwise.
    fn cancel(&self);

    async fn cleanup(&self);
}

/// Timeout error message shared by runners.
pub fn format_timeout_error(timeout_ms: u64) -> String {
    format!("Test execution timeout after {timeout_ms}ms")
}
