// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

/// Storyreport error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration missing a required field or holding an invalid value
    #[error("invalid configuration: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Test result failed structural validation
    #[error("invalid test result: {0}")]
    InvalidResult(String),

    /// Component used before `configure` was called
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    /// A second execution was requested while one is in flight
    #[error("test suite execution already in progress")]
    AlreadyRunning,

    /// Output format name outside the supported set
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File I/O error
    #[error("io error: {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Test runner failed to produce a result
    #[error("test runner error: {0}")]
    Runner(String),

    /// Metrics aggregation failed
    #[error("metrics error: {0}")]
    Metrics(String),

    /// Log sink has no logger with this id
    #[error("Logger {0} not found")]
    LoggerNotFound(String),

    /// Log sink logger was deactivated
    #[error("Logger {0} is not active")]
    LoggerInactive(String),

    /// Log sink logger id is taken
    #[error("Logger {0} already exists")]
    LoggerExists(String),

    /// Report serialization failed
    #[error("serialize error: {0}")]
    Serialize(String),

    /// Internal error (bug)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            path: None,
        }
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Internal(format!("formatting failed: {err}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

/// Result type using storyreport Error
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes for the command-line front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Suite passed and reports were written
    Success = 0,
    /// Suite or pass criteria failed
    CheckFailed = 1,
    /// Configuration or argument error
    ConfigError = 2,
    /// Internal error
    InternalError = 3,
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config { .. } | Error::InvalidResult(_) | Error::UnsupportedFormat(_) => {
                ExitCode::ConfigError
            }
            Error::NotConfigured(_) | Error::AlreadyRunning => ExitCode::InternalError,
            Error::Runner(_) => ExitCode::CheckFailed,
            Error::Io { .. } | Error::Metrics(_) | Error::Serialize(_) | Error::Internal(_) => {
                ExitCode::InternalError
            }
            Error::LoggerNotFound(_) | Error::LoggerInactive(_) | Error::LoggerExists(_) => {
                ExitCode::InternalError
            }
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
