// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSON format report output.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::logsink::LogEntry;
use crate::model::{ResultMetadata, TestResult};

use super::{GENERATOR_NAME, RenderContext, ReportFormatter};

/// Keys of [`ResultMetadata`] that overrides cannot replace.
const RESERVED_METADATA_KEYS: &[&str] = &[
    "logEntries",
    "coverage",
    "duplication",
    "setupConfig",
    "reportGenerated",
];

/// JSON format report formatter.
pub struct JsonFormatter;

/// The result with its metadata augmented, plus a top-level `logs` mirror.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a TestResult,
    logs: &'a [LogEntry],
}

impl JsonFormatter {
    fn augment_metadata(result: &TestResult, ctx: &RenderContext<'_>) -> ResultMetadata {
        let mut metadata = result.metadata.clone();
        metadata.report_generated = Some(ctx.generated_at);
        metadata.report_generator = Some(GENERATOR_NAME.to_string());

        for (key, value) in &ctx.options.metadata {
            match key.as_str() {
                "reportGenerator" => {
                    if let Some(name) = value.as_str() {
                        metadata.report_generator = Some(name.to_string());
                    }
                }
                reserved if RESERVED_METADATA_KEYS.contains(&reserved) => {
                    tracing::debug!("ignoring reserved metadata override {reserved}");
                }
                _ => {
                    metadata.extra.insert(key.clone(), value.clone());
                }
            }
        }

        if let Some(metrics) = &ctx.metrics {
            metadata.coverage = Some(metrics.coverage_summary());
            if !metrics.themes.is_empty() {
                metadata.duplication = Some(metrics.duplication.clone());
            }
        }
        if let Some(setup) = &ctx.setup {
            metadata.setup_config = Some(setup.clone());
        }
        metadata
    }

    fn write<T: Serialize>(value: &T, indent: usize) -> Result<String> {
        if indent == 0 {
            return Ok(serde_json::to_string(value)?);
        }
        let indent = " ".repeat(indent);
        let mut buf = Vec::with_capacity(4096);
        let mut serializer =
            Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| Error::Serialize(e.to_string()))
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, result: &TestResult, ctx: &RenderContext<'_>) -> Result<String> {
        let mut augmented = result.clone();
        augmented.metadata = Self::augment_metadata(result, ctx);
        let report = JsonReport {
            result: &augmented,
            logs: &augmented.metadata.log_entries,
        };

        let json = &ctx.options.json;
        if json.sort_keys {
            Self::write(&sort_keys(serde_json::to_value(&report)?), json.indent)
        } else {
            Self::write(&report, json.indent)
        }
    }
}

/// Rebuild every object with its keys in ascending order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
