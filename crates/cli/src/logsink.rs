// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session log store.
//!
//! A [`LogSink`] keeps an ordered history of entries per logger id. The suite
//! manager copies that history into a result's metadata before rendering.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Severity of a log entry, least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::config(format!("unknown log level: {s}")))
    }
}

/// One captured log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Summary of one logger's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatistics {
    pub total: usize,
    /// Count per level; every level is present, including zeros.
    pub by_level: Vec<(LogLevel, usize)>,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
}

impl LogStatistics {
    pub fn count(&self, level: LogLevel) -> usize {
        self.by_level
            .iter()
            .find(|(l, _)| *l == level)
            .map_or(0, |(_, n)| *n)
    }
}

/// Log store consumed by the suite manager and test runners.
///
/// Operations on an unknown id fail with [`Error::LoggerNotFound`].
pub trait LogSink: Send + Sync {
    /// Register a new logger. Fails if the id is already registered.
    fn initialize_logger(&self, id: &str) -> Result<String>;

    /// Append an entry. Fails if the logger is deactivated.
    fn log(&self, id: &str, level: LogLevel, message: &str) -> Result<()>;

    /// Entries in insertion order.
    fn log_history(&self, id: &str) -> Result<Vec<LogEntry>>;

    fn logs_by_level(&self, id: &str, level: LogLevel) -> Result<Vec<LogEntry>>;

    /// Entries whose message contains `query`.
    fn search_logs(&self, id: &str, query: &str) -> Result<Vec<LogEntry>>;

    fn log_statistics(&self, id: &str) -> Result<LogStatistics>;

    fn clear_logs(&self, id: &str) -> Result<()>;

    fn deactivate_logger(&self, id: &str) -> Result<()>;

    fn reactivate_logger(&self, id: &str) -> Result<()>;

    /// Drop every logger.
    fn cleanup(&self);
}

#[derive(Debug, Default)]
struct Logger {
    active: bool,
    entries: Vec<LogEntry>,
}

/// In-memory [`LogSink`].
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    loggers: Mutex<HashMap<String, Logger>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_logger<T>(&self, id: &str, f: impl FnOnce(&mut Logger) -> Result<T>) -> Result<T> {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let logger = loggers
            .get_mut(id)
            .ok_or_else(|| Error::LoggerNotFound(id.to_string()))?;
        f(logger)
    }

    fn filtered(&self, id: &str, keep: impl Fn(&LogEntry) -> bool) -> Result<Vec<LogEntry>> {
        self.with_logger(id, |logger| {
            Ok(logger.entries.iter().filter(|e| keep(e)).cloned().collect())
        })
    }
}

impl LogSink for MemoryLogSink {
    fn initialize_logger(&self, id: &str) -> Result<String> {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        if loggers.contains_key(id) {
            return Err(Error::LoggerExists(id.to_string()));
        }
        loggers.insert(
            id.to_string(),
            Logger {
                active: true,
                entries: Vec::new(),
            },
        );
        Ok(id.to_string())
    }

    fn log(&self, id: &str, level: LogLevel, message: &str) -> Result<()> {
        self.with_logger(id, |logger| {
            if !logger.active {
                return Err(Error::LoggerInactive(id.to_string()));
            }
            let mut entry = LogEntry::new(level, message);
            // Wall clocks can step backwards; history must not.
            if let Some(last) = logger.entries.last()
                && entry.timestamp < last.timestamp
            {
                entry.timestamp = last.timestamp;
            }
            logger.entries.push(entry);
            Ok(())
        })
    }

    fn log_history(&self, id: &str) -> Result<Vec<LogEntry>> {
        self.filtered(id, |_| true)
    }

    fn logs_by_level(&self, id: &str, level: LogLevel) -> Result<Vec<LogEntry>> {
        self.filtered(id, |e| e.level == level)
    }

    fn search_logs(&self, id: &str, query: &str) -> Result<Vec<LogEntry>> {
        self.filtered(id, |e| e.message.contains(query))
    }

    fn log_statistics(&self, id: &str) -> Result<LogStatistics> {
        self.with_logger(id, |logger| {
            let by_level = LogLevel::ALL
                .into_iter()
                .map(|level| {
                    let n = logger.entries.iter().filter(|e| e.level == level).count();
                    (level, n)
                })
                .collect();
            Ok(LogStatistics {
                total: logger.entries.len(),
                by_level,
                first_timestamp: logger.entries.first().map(|e| e.timestamp),
                last_timestamp: logger.entries.last().map(|e| e.timestamp),
            })
        })
    }

    fn clear_logs(&self, id: &str) -> Result<()> {
        self.with_logger(id, |logger| {
            logger.entries.clear();
            Ok(())
        })
    }

    fn deactivate_logger(&self, id: &str) -> Result<()> {
        self.with_logger(id, |logger| {
            logger.active = false;
            Ok(())
        })
    }

    fn reactivate_logger(&self, id: &str) -> Result<()> {
        self.with_logger(id, |logger| {
            logger.active = true;
            Ok(())
        })
    }

    fn cleanup(&self) {
        self.loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
#[path = "logsink_tests.rs"]
mod tests;
