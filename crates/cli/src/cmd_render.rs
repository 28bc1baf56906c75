// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Render command implementation.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use termcolor::{StandardStream, WriteColor};

use storyreport::cli::{Cli, RenderArgs};
use storyreport::color::{resolve_color, scheme};
use storyreport::config::{self, TestConfiguration};
use storyreport::discovery;
use storyreport::error::{Error, ExitCode};
use storyreport::metrics::MetricsAggregator;
use storyreport::model::TestResult;
use storyreport::report::ReportGenerator;

/// Run the render command.
pub async fn run(cli: &Cli, args: &RenderArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;

    let content = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| Error::Io {
            path: args.input.clone(),
            source: e,
        })?;
    let result = TestResult::from_json_str(&content)?;

    // Rendering only needs report options, so the file is not validated as a suite
    let config_path = discovery::resolve_config(cli.config.as_deref(), &cwd)?;
    let mut config = match &config_path {
        Some(path) => {
            let mut config = load_unvalidated(path)?;
            if config.output_directory.is_relative() {
                config.output_directory =
                    discovery::project_root(path).join(&config.output_directory);
            }
            config
        }
        None => TestConfiguration::default(),
    };
    if config.test_suite_id.trim().is_empty() {
        config.test_suite_id = result.test_suite_id.clone();
    }
    if !args.formats.is_empty() {
        config.output_formats = args.formats.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_directory = dir.clone();
    }

    let root = args
        .root
        .clone()
        .or_else(|| config_path.as_deref().map(discovery::project_root))
        .unwrap_or(cwd);
    tracing::debug!("metrics root: {}", root.display());

    let generator = ReportGenerator::new(Arc::new(MetricsAggregator::new(root)));
    generator.configure(config);
    let paths = generator.save_reports(&result).await?;

    let mut stdout = StandardStream::stdout(resolve_color());
    for path in &paths {
        stdout.set_color(&scheme::path())?;
        write!(stdout, "{}", path.display())?;
        stdout.reset()?;
        writeln!(stdout)?;
    }
    Ok(ExitCode::Success)
}

fn load_unvalidated(path: &Path) -> storyreport::Result<TestConfiguration> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    config::parse(&content, path)
}
