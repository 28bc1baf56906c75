// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report generation.
//!
//! Renders a [`TestResult`] into HTML, JSON, JUnit XML, CSV, or Markdown and
//! persists the rendered documents under the configured output directory.

mod csv;
mod escape;
mod html;
mod json;
mod markdown;
mod xml;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::config::{ReportOptions, TestConfiguration};
use crate::criteria::{PassCriteriaValidator, ValidationResult};
use crate::error::{Error, Result};
use crate::events::{ErrorEvent, Event, EventEmitter, ReportEvent};
use crate::metrics::{AggregatedMetrics, MetricsSource, SetupConfig};
use crate::model::TestResult;

pub use csv::{CsvFormatter, HEADER as CSV_HEADER};
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use xml::XmlFormatter;

/// Generator name recorded in JSON metadata and the Markdown footer.
pub const GENERATOR_NAME: &str = "Story Reporter";

/// RFC 3339 timestamp with millisecond precision and a `Z` suffix.
pub fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Output formats, in the order reports are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportFormat {
    Html,
    Json,
    Xml,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 5] = [
        ReportFormat::Html,
        ReportFormat::Json,
        ReportFormat::Xml,
        ReportFormat::Csv,
        ReportFormat::Markdown,
    ];

    /// Parse a configured format name. Case-sensitive; `md` is a synonym
    /// for `markdown`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "html" => Some(ReportFormat::Html),
            "json" => Some(ReportFormat::Json),
            "xml" => Some(ReportFormat::Xml),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Xml => "xml",
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "markdown",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Markdown => "md",
            other => other.name(),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Pass-criteria section input for the Markdown renderer.
#[derive(Debug, Clone)]
pub enum CriteriaOutcome {
    Verdict(ValidationResult),
    /// Validation failed; carries the error text.
    Unavailable(String),
}

/// Everything a formatter needs besides the result itself.
pub struct RenderContext<'a> {
    pub options: &'a ReportOptions,
    pub generated_at: DateTime<Utc>,
    /// Aggregate metrics merged into JSON metadata.
    pub metrics: Option<AggregatedMetrics>,
    pub setup: Option<SetupConfig>,
    pub criteria: Option<CriteriaOutcome>,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a ReportOptions, generated_at: DateTime<Utc>) -> Self {
        Self {
            options,
            generated_at,
            metrics: None,
            setup: None,
            criteria: None,
        }
    }
}

/// Trait for rendering a test result into one output format.
pub trait ReportFormatter {
    fn format(&self, result: &TestResult, ctx: &RenderContext<'_>) -> Result<String>;
}

pub fn formatter(format: ReportFormat) -> &'static dyn ReportFormatter {
    match format {
        ReportFormat::Html => &HtmlFormatter,
        ReportFormat::Json => &JsonFormatter,
        ReportFormat::Xml => &XmlFormatter,
        ReportFormat::Csv => &CsvFormatter,
        ReportFormat::Markdown => &MarkdownFormatter,
    }
}

/// Expand a file name template and append the format's extension.
///
/// Supports `{testSuiteId}`, `{timestamp}` and `{format}`. Colons and dots
/// in the timestamp become dashes.
pub fn file_name(
    pattern: &str,
    test_suite_id: &str,
    format: ReportFormat,
    at: DateTime<Utc>,
) -> String {
    let timestamp = iso(at).replace([':', '.'], "-");
    let stem = pattern
        .replace("{testSuiteId}", test_suite_id)
        .replace("{timestamp}", &timestamp)
        .replace("{format}", format.name());
    format!("{stem}.{}", format.extension())
}

/// Renders and persists reports, announcing each render as events.
pub struct ReportGenerator {
    events: EventEmitter,
    metrics: Arc<dyn MetricsSource>,
    validator: PassCriteriaValidator,
    config: Mutex<Option<TestConfiguration>>,
}

impl ReportGenerator {
    pub fn new(metrics: Arc<dyn MetricsSource>) -> Self {
        Self {
            events: EventEmitter::new(),
            validator: PassCriteriaValidator::new(Arc::clone(&metrics)),
            metrics,
            config: Mutex::new(None),
        }
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn configure(&self, config: TestConfiguration) {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = Some(config);
    }

    pub fn configuration(&self) -> Option<TestConfiguration> {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn report_options(&self) -> ReportOptions {
        self.configuration()
            .map(|c| c.report_options)
            .unwrap_or_default()
    }

    pub async fn generate_html_report(&self, result: &TestResult) -> Result<String> {
        self.generate(ReportFormat::Html, result).await
    }

    pub async fn generate_json_report(&self, result: &TestResult) -> Result<String> {
        self.generate(ReportFormat::Json, result).await
    }

    pub async fn generate_xml_report(&self, result: &TestResult) -> Result<String> {
        self.generate(ReportFormat::Xml, result).await
    }

    pub async fn generate_csv_report(&self, result: &TestResult) -> Result<String> {
        self.generate(ReportFormat::Csv, result).await
    }

    pub async fn generate_markdown_report(&self, result: &TestResult) -> Result<String> {
        self.generate(ReportFormat::Markdown, result).await
    }

    /// Render one format using the configured report options.
    pub async fn generate(&self, format: ReportFormat, result: &TestResult) -> Result<String> {
        let options = self.report_options();
        let generated_at = options.generated_at.unwrap_or_else(Utc::now);
        self.render(format, result, &options, generated_at).await
    }

    /// Render every configured format.
    ///
    /// Fails on the first unsupported format name; nothing is returned for
    /// formats rendered before it.
    pub async fn generate_all_reports(
        &self,
        result: &TestResult,
    ) -> Result<BTreeMap<ReportFormat, String>> {
        let config = self
            .configuration()
            .ok_or(Error::NotConfigured("report generator"))?;
        let generated_at = config.report_options.generated_at.unwrap_or_else(Utc::now);
        self.render_all(result, &config, generated_at).await
    }

    async fn render_all(
        &self,
        result: &TestResult,
        config: &TestConfiguration,
        generated_at: DateTime<Utc>,
    ) -> Result<BTreeMap<ReportFormat, String>> {
        let mut reports = BTreeMap::new();
        for name in &config.output_formats {
            let Some(format) = ReportFormat::parse(name) else {
                let err = Error::UnsupportedFormat(name.clone());
                self.emit_error(&err, Some(name), &result.test_suite_id);
                return Err(err);
            };
            if reports.contains_key(&format) {
                continue;
            }
            let rendered = self
                .render(format, result, &config.report_options, generated_at)
                .await?;
            reports.insert(format, rendered);
        }
        Ok(reports)
    }

    /// Render every configured format and write each under the output
    /// directory, creating it if needed. Returns the written paths in format
    /// order.
    pub async fn save_reports(&self, result: &TestResult) -> Result<Vec<PathBuf>> {
        let config = self
            .configuration()
            .ok_or(Error::NotConfigured("report generator"))?;
        let generated_at = config.report_options.generated_at.unwrap_or_else(Utc::now);
        let reports = self.render_all(result, &config, generated_at).await?;

        let dir = &config.output_directory;
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            let err = Error::io(dir, e);
            self.emit_error(&err, None, &result.test_suite_id);
            return Err(err);
        }

        let mut written = Vec::with_capacity(reports.len());
        for (format, content) in reports {
            let name = file_name(
                &config.report_options.file_name_pattern,
                &result.test_suite_id,
                format,
                generated_at,
            );
            let path = dir.join(name);
            if let Err(e) = tokio::fs::write(&path, content).await {
                let err = Error::io(&path, e);
                self.emit_error(&err, Some(format.name()), &result.test_suite_id);
                return Err(err);
            }
            debug!("wrote {} report to {}", format, path.display());
            written.push(path);
        }
        Ok(written)
    }

    async fn render(
        &self,
        format: ReportFormat,
        result: &TestResult,
        options: &ReportOptions,
        generated_at: DateTime<Utc>,
    ) -> Result<String> {
        let suite = &result.test_suite_id;
        self.events.emit(Event::ReportStart(ReportEvent {
            format: format.name().to_string(),
            test_suite_id: suite.clone(),
            timestamp: Utc::now(),
            size: None,
        }));
        self.events.emit(Event::progress(
            "report",
            format!("Generating {format} report"),
        ));

        let mut ctx = RenderContext::new(options, generated_at);
        match format {
            ReportFormat::Json => match self.metrics.aggregate_metrics().await {
                Ok(metrics) => {
                    ctx.setup = Some(self.metrics.setup_config(None).await);
                    ctx.metrics = Some(metrics);
                }
                Err(e) => warn!("metrics unavailable for JSON report: {e}"),
            },
            ReportFormat::Markdown => {
                ctx.criteria = Some(match self.validator.validate(result).await {
                    Ok(verdict) => CriteriaOutcome::Verdict(verdict),
                    Err(e) => {
                        warn!("pass criteria unavailable for Markdown report: {e}");
                        CriteriaOutcome::Unavailable(e.to_string())
                    }
                });
            }
            _ => {}
        }

        match formatter(format).format(result, &ctx) {
            Ok(rendered) => {
                self.events.emit(Event::ReportComplete(ReportEvent {
                    format: format.name().to_string(),
                    test_suite_id: suite.clone(),
                    timestamp: Utc::now(),
                    size: Some(rendered.len()),
                }));
                Ok(rendered)
            }
            Err(e) => {
                self.emit_error(&e, Some(format.name()), suite);
                Err(e)
            }
        }
    }

    fn emit_error(&self, err: &Error, format: Option<&str>, test_suite_id: &str) {
        self.events.emit(Event::Error(ErrorEvent {
            error: err.to_string(),
            format: format.map(str::to_string),
            test_suite_id: test_suite_id.to_string(),
            timestamp: Utc::now(),
        }));
    }

    /// Drop the configuration and every observer.
    pub fn cleanup(&self) {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.events.remove_all_observers();
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
