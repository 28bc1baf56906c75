// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Suite configuration.
//!
//! Handles storyreport.toml parsing, defaults, and validation. Keys use the
//! same camelCase names as the JSON configuration snapshot stored in results.

mod duration;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::logsink::LogLevel;

pub use duration::parse_duration;

/// Default report file name template.
pub const DEFAULT_FILE_NAME_PATTERN: &str = "{testSuiteId}-{timestamp}-{format}";

/// Default per-run timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const KNOWN_KEYS: &[&str] = &[
    "testSuiteId",
    "featureFiles",
    "stepDefinitions",
    "outputFormats",
    "outputDirectory",
    "logLevel",
    "timeout",
    "tags",
    "excludeTags",
    "parallel",
    "retry",
    "reportOptions",
];

/// Everything a suite run needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestConfiguration {
    pub test_suite_id: String,
    pub feature_files: Vec<String>,
    pub step_definitions: Vec<String>,
    /// Format names; checked when reports are generated.
    pub output_formats: Vec<String>,
    pub output_directory: PathBuf,
    pub log_level: LogLevel,
    /// Milliseconds. Accepts an integer or a duration string like `"30s"`.
    #[serde(deserialize_with = "duration::deserialize_millis")]
    pub timeout: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<ParallelConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    pub report_options: ReportOptions,
}

impl Default for TestConfiguration {
    fn default() -> Self {
        Self {
            test_suite_id: String::new(),
            feature_files: Vec::new(),
            step_definitions: Vec::new(),
            output_formats: vec!["json".to_string()],
            output_directory: PathBuf::from("./test-results"),
            log_level: LogLevel::Info,
            timeout: DEFAULT_TIMEOUT_MS,
            tags: Vec::new(),
            exclude_tags: Vec::new(),
            parallel: None,
            retry: None,
            report_options: ReportOptions::default(),
        }
    }
}

impl TestConfiguration {
    /// Configuration with the required fields set and defaults elsewhere.
    pub fn new(
        test_suite_id: impl Into<String>,
        feature_files: Vec<String>,
        step_definitions: Vec<String>,
    ) -> Self {
        Self {
            test_suite_id: test_suite_id.into(),
            feature_files,
            step_definitions,
            ..Self::default()
        }
    }

    /// Check required fields, stopping at the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.test_suite_id.trim().is_empty() {
            return Err(Error::config(
                "testSuiteId is required and must be a non-empty string",
            ));
        }
        if self.feature_files.is_empty() {
            return Err(Error::config(
                "featureFiles is required and must be a non-empty array",
            ));
        }
        if self.step_definitions.is_empty() {
            return Err(Error::config(
                "stepDefinitions is required and must be a non-empty array",
            ));
        }
        if self.output_directory.as_os_str().is_empty() {
            return Err(Error::config("outputDirectory must be a non-empty path"));
        }
        if self.timeout == 0 {
            return Err(Error::config("timeout must be a positive number"));
        }
        Ok(())
    }

    /// JSON snapshot stored in results.
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub enabled: bool,
    pub workers: u32,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub attempts: u32,
    pub delay_ms: u64,
}

/// Presentation options shared by every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub file_name_pattern: String,
    pub json: JsonOptions,
    pub xml: XmlOptions,
    pub html: HtmlOptions,
    /// Merged into the JSON report's metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Fixed generation time; "now" when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            file_name_pattern: DEFAULT_FILE_NAME_PATTERN.to_string(),
            json: JsonOptions::default(),
            xml: XmlOptions::default(),
            html: HtmlOptions::default(),
            metadata: BTreeMap::new(),
            generated_at: None,
        }
    }
}

impl ReportOptions {
    /// Generator name from the metadata overrides, if any.
    pub fn generator_name(&self) -> Option<&str> {
        self.metadata
            .get("reportGenerator")
            .and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonOptions {
    /// Spaces per level; 0 renders compact JSON.
    pub indent: usize,
    pub sort_keys: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    pub encoding: String,
    pub standalone: bool,
    pub indent: usize,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            standalone: true,
            indent: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HtmlOptions {
    pub theme: HtmlTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

/// Load and validate a configuration file.
pub fn load(path: &Path) -> Result<TestConfiguration> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = parse(&content, path)?;
    config.validate().map_err(|e| match e {
        Error::Config { message, .. } => Error::Config {
            message,
            path: Some(path.to_path_buf()),
        },
        other => other,
    })?;
    Ok(config)
}

/// Parse configuration from TOML, warning on unknown top-level keys.
///
/// Does not validate; see [`TestConfiguration::validate`].
pub fn parse(content: &str, path: &Path) -> Result<TestConfiguration> {
    let table: toml::Table = toml::from_str(content).map_err(|e| Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, key);
        }
    }

    toml::from_str(content).map_err(|e| Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })
}

fn warn_unknown_key(path: &Path, key: &str) {
    eprintln!(
        "storyreport: warning: {}: unrecognized field `{}` (ignored)",
        path.display(),
        key
    );
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
