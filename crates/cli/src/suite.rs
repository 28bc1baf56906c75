// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite orchestration.
//!
//! The [`SuiteManager`] owns a test runner and a report generator, runs one
//! execution at a time, and re-emits every child event on its own emitter.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TestConfiguration;
use crate::error::{Error, Result};
use crate::events::{Event, EventEmitter};
use crate::logsink::{LogLevel, LogSink};
use crate::metrics::MetricsSource;
use crate::model::{ScenarioResult, ScenarioStatus, TestResult, TestStatus};
use crate::report::ReportGenerator;
use crate::runner::TestRunner;

/// Wait after cancelling an in-flight run during cleanup.
pub const CLEANUP_GRACE: Duration = Duration::from_millis(100);

/// Message recorded on results of cancelled runs.
pub const CANCELLED_MESSAGE: &str = "Test execution was cancelled";

/// Outcome of [`SuiteManager::execute_and_generate_reports`].
#[derive(Debug, Clone)]
pub struct SuiteRun {
    pub result: TestResult,
    pub report_paths: Vec<PathBuf>,
}

/// Clears the running flag however the execution ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Configures, executes, and reports on a test suite.
pub struct SuiteManager {
    events: EventEmitter,
    runner: Arc<dyn TestRunner>,
    reports: ReportGenerator,
    log_sink: Arc<dyn LogSink>,
    config: Mutex<Option<TestConfiguration>>,
    running: AtomicBool,
    cancelled: AtomicBool,
    forwarding: AtomicBool,
    logger_id: Mutex<Option<String>>,
    token: Mutex<Option<CancellationToken>>,
}

impl SuiteManager {
    pub fn new(
        runner: Arc<dyn TestRunner>,
        metrics: Arc<dyn MetricsSource>,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            events: EventEmitter::new(),
            runner,
            reports: ReportGenerator::new(metrics),
            log_sink,
            config: Mutex::new(None),
            running: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            forwarding: AtomicBool::new(false),
            logger_id: Mutex::new(None),
            token: Mutex::new(None),
        }
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn configuration(&self) -> Option<TestConfiguration> {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn logger_id(&self) -> Option<String> {
        self.logger_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        if let Some(id) = self.logger_id()
            && let Err(e) = self.log_sink.log(&id, level, &message)
        {
            debug!("log sink rejected entry: {e}");
        }
        self.events.emit(Event::log(level, message));
    }

    /// Re-emit every runner and report event on this manager's emitter.
    fn wire_forwarding(&self) {
        if self.forwarding.swap(true, Ordering::SeqCst) {
            return;
        }
        for child in [self.runner.events(), self.reports.events()] {
            let parent = self.events.clone();
            child.add_observer(move |event| parent.emit(event.clone()));
        }
    }

    /// Validate and apply a configuration to the manager and its children.
    pub fn configure(&self, config: TestConfiguration) -> Result<()> {
        config.validate()?;
        self.wire_forwarding();
        self.runner.configure(&config)?;
        self.reports.configure(config.clone());

        let id = config.test_suite_id.clone();
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
        self.log(LogLevel::Info, format!("Test suite configured: {id}"));
        self.events
            .emit(Event::progress("configure", format!("Configuration accepted for {id}")));
        Ok(())
    }

    /// Register a logger for this suite in the log sink and hand it to the
    /// runner. Returns the logger id; repeated calls return the same id.
    pub fn initialize_log_library(&self) -> Result<String> {
        if let Some(id) = self.logger_id() {
            return Ok(id);
        }
        let config = self
            .configuration()
            .ok_or(Error::NotConfigured("test suite manager"))?;
        let id = self.log_sink.initialize_logger(&config.test_suite_id)?;
        self.runner
            .set_external_logger(Arc::clone(&self.log_sink), &id);
        *self.logger_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(id.clone());
        self.events
            .emit(Event::progress("logLibrary", format!("initialized {id}")));
        Ok(id)
    }

    /// Run the configured suite once.
    ///
    /// Fails only when unconfigured or when another execution is in flight.
    /// Runner failures become a failed result.
    pub async fn execute_test_suite(&self) -> Result<TestResult> {
        let config = self
            .configuration()
            .ok_or(Error::NotConfigured("test suite manager"))?;
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }
        let _running = RunningGuard(&self.running);
        self.cancelled.store(false, Ordering::SeqCst);

        let token = CancellationToken::new();
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        let id = config.test_suite_id.clone();
        self.events.emit(Event::TestSuiteStart {
            test_suite_id: id.clone(),
            timestamp: Utc::now(),
        });
        self.log(LogLevel::Debug, format!("Test suite execution started: {id}"));

        let mut result = match self.runner.execute_tests(token).await {
            Ok(result) => result,
            Err(e) => {
                self.log(LogLevel::Error, format!("Test suite execution failed: {e}"));
                failed_result(&config, &e)
            }
        };

        if self.cancelled.load(Ordering::SeqCst) {
            result.status = TestStatus::Cancelled;
            result.error_message = Some(CANCELLED_MESSAGE.to_string());
        }

        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.log(
            LogLevel::Debug,
            format!("Test suite execution finished: {id} ({})", result.status),
        );
        self.events.emit(Event::TestSuiteComplete {
            test_suite_id: id,
            status: result.status,
            timestamp: Utc::now(),
        });
        Ok(result)
    }

    /// Render and persist every configured report format.
    pub async fn generate_reports(&self, result: &TestResult) -> Result<Vec<PathBuf>> {
        if self.configuration().is_none() {
            return Err(Error::NotConfigured("test suite manager"));
        }
        self.reports.save_reports(result).await
    }

    /// Execute, merge the suite's log history, and write reports.
    pub async fn execute_and_generate_reports(&self) -> Result<SuiteRun> {
        let mut result = self.execute_test_suite().await?;
        if let Some(id) = self.logger_id() {
            match self.log_sink.log_history(&id) {
                Ok(entries) => result.metadata.log_entries.extend(entries),
                Err(e) => warn!("could not read log history for {id}: {e}"),
            }
        }
        let report_paths = self.generate_reports(&result).await?;
        Ok(SuiteRun {
            result,
            report_paths,
        })
    }

    /// Request cooperative cancellation of the in-flight execution.
    pub fn cancel(&self) {
        if !self.is_running() {
            return;
        }
        self.cancelled.store(true, Ordering::SeqCst);
        let token = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(token) = token {
            token.cancel();
        }
        self.runner.cancel();
        self.log(LogLevel::Warn, "Test suite execution cancellation requested");
    }

    /// Tear down the children and the log library, then forget the
    /// configuration and every observer.
    ///
    /// Safe to call repeatedly, configured or not.
    pub async fn cleanup(&self) {
        if self.is_running() {
            self.cancel();
            tokio::time::sleep(CLEANUP_GRACE).await;
        }
        self.runner.cleanup().await;
        self.reports.cleanup();

        let logger = self
            .logger_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(id) = logger {
            self.log_sink.cleanup();
            self.events
                .emit(Event::progress("logLibrary", format!("cleaned {id}")));
        }

        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.forwarding.store(false, Ordering::SeqCst);
        self.events.remove_all_observers();
    }
}

/// Failed result standing in for a run whose runner errored.
fn failed_result(config: &TestConfiguration, err: &Error) -> TestResult {
    let message = err.to_string();
    let stack = format!("{err:?}");

    let mut scenario = ScenarioResult::new("Test Execution", ScenarioStatus::Failed);
    scenario.error_message = Some(message.clone());
    scenario.error_stack = Some(stack.clone());

    let mut result = TestResult::create_default(&config.test_suite_id, TestStatus::Failed);
    result.scenarios = vec![scenario];
    result.total_scenarios = 1;
    result.failed_scenarios = 1;
    result.error_message = Some(message);
    result.error_stack = Some(stack);
    result.configuration = config.snapshot();
    result
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
