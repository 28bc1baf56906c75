// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Validate command implementation.

use std::io::Write;
use std::sync::Arc;

use termcolor::{StandardStream, WriteColor};

use storyreport::cli::{Cli, ValidateArgs};
use storyreport::color::{resolve_color, scheme, write_verdict};
use storyreport::criteria::PassCriteriaValidator;
use storyreport::discovery;
use storyreport::error::{Error, ExitCode};
use storyreport::metrics::MetricsAggregator;
use storyreport::model::TestResult;

/// Run the validate command.
pub async fn run(cli: &Cli, args: &ValidateArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;

    let content = tokio::fs::read_to_string(&args.input)
        .await
        .map_err(|e| Error::Io {
            path: args.input.clone(),
            source: e,
        })?;
    let result = TestResult::from_json_str(&content)?;

    let root = match &args.root {
        Some(root) => root.clone(),
        None => discovery::resolve_config(cli.config.as_deref(), &cwd)?
            .map_or(cwd, |path| discovery::project_root(&path)),
    };

    let validator = PassCriteriaValidator::new(Arc::new(MetricsAggregator::new(root)));
    let verdict = validator.validate(&result).await?;

    let mut stdout = StandardStream::stdout(resolve_color());
    for criterion in &verdict.criteria {
        write_verdict(&mut stdout, criterion.passed)?;
        write!(stdout, "  ")?;
        stdout.set_color(&scheme::name())?;
        write!(stdout, "{}", criterion.name)?;
        stdout.reset()?;
        writeln!(
            stdout,
            ": {:.2}% (threshold: {}%)",
            criterion.actual, criterion.threshold
        )?;
    }

    writeln!(stdout)?;
    write_verdict(&mut stdout, verdict.passed)?;
    writeln!(
        stdout,
        " {}/{} criteria passed",
        verdict.summary.passed_criteria, verdict.summary.total_criteria
    )?;

    if verdict.passed {
        Ok(ExitCode::Success)
    } else {
        Ok(ExitCode::CheckFailed)
    }
}
