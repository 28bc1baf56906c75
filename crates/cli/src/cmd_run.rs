// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run command implementation.

use std::io::Write;
use std::sync::Arc;

use termcolor::{StandardStream, WriteColor};

use storyreport::cli::{Cli, RunArgs};
use storyreport::color::{resolve_color, scheme, write_status};
use storyreport::config;
use storyreport::discovery;
use storyreport::error::{Error, ExitCode};
use storyreport::events::Event;
use storyreport::logsink::MemoryLogSink;
use storyreport::metrics::MetricsAggregator;
use storyreport::model::TestStatus;
use storyreport::runner::CucumberReportRunner;
use storyreport::suite::SuiteManager;

/// Run the run command.
pub async fn run(cli: &Cli, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;

    let config_path = discovery::resolve_config(cli.config.as_deref(), &cwd)?.ok_or_else(|| {
        Error::Config {
            message: format!("no {} found", discovery::CONFIG_FILE),
            path: None,
        }
    })?;
    let mut config = config::load(&config_path)?;
    let project = discovery::project_root(&config_path);
    if config.output_directory.is_relative() {
        config.output_directory = project.join(&config.output_directory);
    }
    let root = args.root.clone().unwrap_or(project);

    tracing::debug!("config: {}", config_path.display());
    tracing::debug!("metrics root: {}", root.display());

    let runner = Arc::new(CucumberReportRunner::new(args.cucumber_json.clone()));
    let suite = SuiteManager::new(
        runner,
        Arc::new(MetricsAggregator::new(root)),
        Arc::new(MemoryLogSink::new()),
    );
    suite.events().add_observer(trace_event);

    suite.configure(config)?;
    suite.initialize_log_library()?;

    let outcome = suite.execute_and_generate_reports().await;
    suite.cleanup().await;
    let run = outcome?;

    let mut stdout = StandardStream::stdout(resolve_color());
    for path in &run.report_paths {
        stdout.set_color(&scheme::path())?;
        write!(stdout, "{}", path.display())?;
        stdout.reset()?;
        writeln!(stdout)?;
    }

    let result = &run.result;
    stdout.set_color(&scheme::name())?;
    write!(stdout, "{}", result.test_suite_id)?;
    stdout.reset()?;
    write!(stdout, ": ")?;
    write_status(&mut stdout, result.status)?;
    writeln!(
        stdout,
        " ({}/{} scenarios passed)",
        result.passed_scenarios, result.total_scenarios
    )?;

    if result.status == TestStatus::Passed {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::CheckFailed)
    }
}

fn trace_event(event: &Event) {
    match event {
        Event::Log { level, message } => tracing::info!("[{level}] {message}"),
        Event::Progress(progress) => tracing::debug!("{}: {}", progress.kind, progress.message),
        Event::Error(error) => tracing::warn!("{}", error.error),
        other => tracing::trace!("{}", other.name()),
    }
}
