// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events and the observer registry that delivers them.
//!
//! Components own an [`EventEmitter`]. The suite manager forwards every
//! event its children emit onto its own emitter, unchanged and in order.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::logsink::LogLevel;
use crate::model::{ScenarioStatus, TestStatus};

/// Payload of `reportStart` and `reportComplete`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEvent {
    pub format: String,
    pub test_suite_id: String,
    pub timestamp: DateTime<Utc>,
    /// Rendered size in bytes; completion only.
    pub size: Option<usize>,
}

/// Payload of `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEvent {
    pub error: String,
    pub format: Option<String>,
    pub test_suite_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload of `progress`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    pub fn now(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Log {
        level: LogLevel,
        message: String,
    },
    Progress(ProgressEvent),
    TestSuiteStart {
        test_suite_id: String,
        timestamp: DateTime<Utc>,
    },
    TestSuiteComplete {
        test_suite_id: String,
        status: TestStatus,
        timestamp: DateTime<Utc>,
    },
    TestStart {
        test_suite_id: String,
        timestamp: DateTime<Utc>,
    },
    TestComplete {
        test_suite_id: String,
        status: TestStatus,
        timestamp: DateTime<Utc>,
    },
    FeatureStart {
        name: String,
        timestamp: DateTime<Utc>,
    },
    FeatureComplete {
        name: String,
        status: ScenarioStatus,
        timestamp: DateTime<Utc>,
    },
    ReportStart(ReportEvent),
    ReportComplete(ReportEvent),
    Error(ErrorEvent),
}

impl Event {
    /// Stable event name.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Log { .. } => "log",
            Event::Progress(_) => "progress",
            Event::TestSuiteStart { .. } => "testSuiteStart",
            Event::TestSuiteComplete { .. } => "testSuiteComplete",
            Event::TestStart { .. } => "testStart",
            Event::TestComplete { .. } => "testComplete",
            Event::FeatureStart { .. } => "featureStart",
            Event::FeatureComplete { .. } => "featureComplete",
            Event::ReportStart(_) => "reportStart",
            Event::ReportComplete(_) => "reportComplete",
            Event::Error(_) => "error",
        }
    }

    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Event::Log {
            level,
            message: message.into(),
        }
    }

    pub fn progress(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Event::Progress(ProgressEvent::now(kind, message))
    }
}

type Observer = Arc<dyn Fn(&Event) + Send + Sync>;

/// Synchronous, ordered event delivery to registered observers.
///
/// Clones share the same observer list.
#[derive(Clone, Default)]
pub struct EventEmitter {
    observers: Arc<Mutex<Vec<Observer>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer that receives every emitted event.
    pub fn add_observer<F>(&self, observer: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.lock().push(Arc::new(observer));
    }

    /// Adds an observer for events with the given name only.
    pub fn on<F>(&self, name: &'static str, observer: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.add_observer(move |event| {
            if event.name() == name {
                observer(event);
            }
        });
    }

    pub fn emit(&self, event: Event) {
        // Observers may emit in turn, so the list is not held while calling.
        let observers = self.lock().clone();
        for observer in &observers {
            observer(&event);
        }
    }

    pub fn remove_all_observers(&self) {
        self.lock().clear();
    }

    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Observer>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Observer that records events, for tests and the CLI.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    /// Record everything `emitter` emits from now on.
    pub fn attach(emitter: &EventEmitter) -> Self {
        let log = Self::default();
        let sink = log.clone();
        emitter.add_observer(move |event| {
            sink.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        });
        log
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(Event::name).collect()
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
